pub mod agent;
pub mod hex;
pub mod htp_server;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{Context, Error, anyhow, bail};
        pub type Result<T> = anyhow::Result<T, Error>;

        pub use std::{
            collections::{HashMap, HashSet},
            ops::{Add, Neg, Sub},
        };
    }
}

pub mod prelude {
    pub use super::agent::*;
    pub use super::hex::prelude::*;
    pub use super::htp_server::*;
    pub use super::utils::prelude::*;
}
