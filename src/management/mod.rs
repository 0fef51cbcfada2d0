mod provisioner;
mod token;

pub use provisioner::{ClientProvider, InteractiveLogin, LoginFlow, Provisioner};
pub use token::TokenStore;
