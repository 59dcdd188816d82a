pub mod activation;
pub mod enums;
pub mod pair;
pub mod price;
pub mod rpc;
pub mod token;

pub use activation::*;
pub use enums::*;
pub use pair::*;
pub use price::*;
pub use rpc::*;
pub use token::*;
