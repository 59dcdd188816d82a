//! Outbound messages and the screens of the funnel.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use upstream::{Network, TokenInfo, TxStatus};

use crate::catalog::PACKAGES;
use crate::input::Action;
use crate::relay::PendingActivation;
use crate::session::UserId;

const NETWORK_MENU_IMAGE: &str = "https://raw.githubusercontent.com/edenalpha687/weibo-trending-bot/main/1190BF8B-063E-4AFE-8B1D-88E9BF653834.png";
const CA_PROMPT_IMAGE: &str = "https://raw.githubusercontent.com/edenalpha687/weibo-trending-bot/main/F33A4A2F-E8A9-440E-BA47-F7603692010A.png";

/// Who a reply goes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Recipient {
    User(UserId),
    Channel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    pub label: String,
    /// Callback token of the action.
    pub action: String,
}

impl Button {
    pub fn new(label: impl Into<String>, action: &Action) -> Self {
        Self {
            label: label.into(),
            action: action.to_string(),
        }
    }
}

/// A message for the transport to deliver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub to: Recipient,
    pub text: String,
    /// Sent as a photo with `text` as caption when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keyboard: Vec<Vec<Button>>,
}

impl Reply {
    pub fn text(to: Recipient, text: impl Into<String>) -> Self {
        Self {
            to,
            text: text.into(),
            image: None,
            keyboard: Vec::new(),
        }
    }

    pub fn to_user(user: UserId, text: impl Into<String>) -> Self {
        Self::text(Recipient::User(user), text)
    }

    pub fn with_image(mut self, url: Option<impl Into<String>>) -> Self {
        self.image = url.map(Into::into);
        self
    }

    pub fn with_keyboard(mut self, keyboard: Vec<Vec<Button>>) -> Self {
        self.keyboard = keyboard;
        self
    }
}

/// `$1.23M`, `$4.56K`, `$7.89`, or `—` for missing/zero.
pub fn fmt_usd(value: Option<f64>) -> String {
    match value {
        None => "—".to_string(),
        Some(v) if v == 0.0 => "—".to_string(),
        Some(v) if v >= 1_000_000.0 => format!("${:.2}M", v / 1_000_000.0),
        Some(v) if v >= 1_000.0 => format!("${:.2}K", v / 1_000.0),
        Some(v) => format!("${v:.2}"),
    }
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

pub fn welcome(user: UserId) -> Reply {
    Reply::to_user(
        user,
        "🔥 WEIBO TRENDING 🇨🇳 🐇\n\n\
         🐰Boost Visibility for your Token in the Chinese market\n\
         Fast Activation • Manual Control • Chinese visibility 🇨🇳",
    )
    .with_keyboard(vec![vec![Button::new(
        "🐰Activate Weibo Trending 🇨🇳",
        &Action::Begin,
    )]])
}

pub fn network_menu(user: UserId) -> Reply {
    let rows = Network::ALL
        .chunks(3)
        .map(|row| {
            row.iter()
                .map(|n| Button::new(n.symbol(), &Action::SelectNetwork(*n)))
                .collect()
        })
        .collect();
    Reply::to_user(user, "Choose Network")
        .with_image(Some(NETWORK_MENU_IMAGE))
        .with_keyboard(rows)
}

pub fn ca_prompt(user: UserId) -> Reply {
    Reply::to_user(user, "Enter Your Token CA").with_image(Some(CA_PROMPT_IMAGE))
}

pub fn token_card(user: UserId, token: &TokenInfo) -> Reply {
    let mut text = format!(
        "Token Detected\n\n\
         Name: {}\n\
         Symbol: {}\n\
         Price: ${}\n\
         Liquidity: {}\n\
         Market Cap: {}",
        token.name,
        token.symbol,
        token.price_usd.as_deref().unwrap_or("—"),
        fmt_usd(token.liquidity_usd),
        fmt_usd(token.market_cap_usd),
    );
    if let Some(tg) = &token.telegram_link {
        text.push_str(&format!("\nTelegram: {tg}"));
    }
    if let Some(x) = &token.twitter_link {
        text.push_str(&format!("\nTwitter: {x}"));
    }
    Reply::to_user(user, text).with_image(token.logo_url.as_deref())
}

pub fn package_menu(user: UserId) -> Reply {
    let mut rows: Vec<Vec<Button>> = PACKAGES
        .chunks(2)
        .map(|row| {
            row.iter()
                .map(|p| {
                    Button::new(
                        format!("{} — ${}", p.label, p.usd_price),
                        &Action::SelectPackage(p),
                    )
                })
                .collect()
        })
        .collect();
    rows.push(vec![Button::new("⬅ Back", &Action::BackToNetworks)]);
    Reply::to_user(user, "Select Trending Package").with_keyboard(rows)
}

pub fn payment_summary(
    user: UserId,
    network: Network,
    token: &TokenInfo,
    label: &str,
    usd_price: Decimal,
    payable: Decimal,
) -> Reply {
    Reply::to_user(
        user,
        format!(
            "Order Summary\n\n\
             Token: {} ({})\n\
             Package: {label}\n\
             Price: ${usd_price}\n\
             Network: {network}\n\
             Amount: {payable} {}",
            token.name,
            token.symbol,
            network.native_unit(),
        ),
    )
    .with_keyboard(vec![vec![
        Button::new("⬅ Back", &Action::BackToPackages),
        Button::new("✅ Confirm", &Action::Confirm),
    ]])
}

pub fn wallet_reveal(user: UserId, network: Network, payable: Decimal, wallet: &str) -> Reply {
    Reply::to_user(
        user,
        format!(
            "Send exactly {payable} {} on {network} to:\n\n{wallet}\n\n\
             Then send your TXID here.",
            network.native_unit(),
        ),
    )
    .with_keyboard(vec![vec![Button::new("I've paid", &Action::Paid)]])
}

pub fn txid_prompt(user: UserId) -> Reply {
    Reply::to_user(user, "Send your transaction TXID.")
}

pub fn submission_ack(user: UserId) -> Reply {
    Reply::to_user(
        user,
        "Payment submitted. Your trending will start once it is reviewed.",
    )
}

pub fn admin_request(admin: UserId, reference: &str, pending: &PendingActivation) -> Reply {
    Reply::to_user(
        admin,
        format!(
            "New Trending Order\n\n\
             User: {}\n\
             Token: {} ({})\n\
             CA: {}\n\
             Network: {}\n\
             Package: {} (${})\n\
             Amount: {} {}\n\
             TXID: {}\n\
             Chain status: {}\n\
             Submitted: {}",
            pending.user_id,
            pending.token.name,
            pending.token.symbol,
            pending.token.address,
            pending.network,
            pending.package_label,
            pending.usd_price,
            pending.payable_amount,
            pending.network.native_unit(),
            pending.txid,
            pending.chain_status,
            pending.submitted_at.format("%Y-%m-%d %H:%M UTC"),
        ),
    )
    .with_keyboard(vec![vec![Button::new(
        "▶ Start Trending",
        &Action::AdminApprove(reference.to_string()),
    )]])
}

pub fn broadcast(channel: &str, pending: &PendingActivation, started: DateTime<Utc>) -> Reply {
    Reply::text(
        Recipient::Channel(channel.to_string()),
        format!(
            "Weibo Trending Live\n\n\
             {} ({})\n\
             CA: {}\n\
             Started: {}",
            pending.token.name,
            pending.token.symbol,
            pending.token.address,
            started.format("%H:%M UTC"),
        ),
    )
}

pub fn admin_ack(admin: UserId) -> Reply {
    Reply::to_user(admin, "Trending activated.")
}

/// Status line for a verifier result, used by the `verify` command.
pub fn status_line(txid: &str, status: TxStatus) -> String {
    format!("{txid}\t{status}")
}
