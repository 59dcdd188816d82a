use std::io::{self, Write};

use crate::reply::{Recipient, Reply};

/// Format a reply and write it to the writer.
///
/// JSON mode emits one object per line; otherwise a header line with the
/// recipient, the body, and one `[label] -> TOKEN` line per button.
pub fn write_reply<W: Write>(
    reply: &Reply,
    json_mode: bool,
    buf: &mut String,
    writer: &mut W,
) -> io::Result<()> {
    buf.clear();

    if json_mode {
        let line = serde_json::to_string(reply).map_err(io::Error::other)?;
        buf.push_str(&line);
    } else {
        match &reply.to {
            Recipient::User(id) => buf.push_str(&format!("── to user {id}")),
            Recipient::Channel(name) => buf.push_str(&format!("── to channel {name}")),
        }
        if let Some(image) = &reply.image {
            buf.push_str(" [image ");
            buf.push_str(image);
            buf.push(']');
        }
        buf.push('\n');
        buf.push_str(&reply.text);
        for row in &reply.keyboard {
            buf.push('\n');
            let cells: Vec<String> = row
                .iter()
                .map(|b| format!("[{}] -> {}", b.label, b.action))
                .collect();
            buf.push_str(&cells.join("   "));
        }
    }

    buf.push('\n');
    writer.write_all(buf.as_bytes())?;
    writer.flush()
}
