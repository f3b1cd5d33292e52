//! Node keypair persistence.

use std::{fs, path::Path};

use anyhow::Result;
use libp2p::identity::Keypair;

/// Load the keypair stored at `path`, generating and saving a fresh
/// Ed25519 keypair on first use.
pub fn load_or_generate_keypair<P: AsRef<Path>>(path: P) -> Result<Keypair> {
    let path = path.as_ref();

    if path.exists() {
        let bytes = fs::read(path)?;
        let keypair = Keypair::from_protobuf_encoding(&bytes)?;
        Ok(keypair)
    } else {
        let keypair = Keypair::generate_ed25519();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = keypair.to_protobuf_encoding()?;
        fs::write(path, &bytes)?;

        Ok(keypair)
    }
}
