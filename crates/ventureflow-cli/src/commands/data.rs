use anyhow::{bail, Result};

use crate::commands::open_store;

pub fn clear(yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to wipe stored data without --yes");
    }
    let store = open_store()?;
    store.clear_all()?;
    println!("All stored data cleared.");
    Ok(())
}

pub fn export() -> Result<()> {
    let store = open_store()?;
    println!("{}", store.dump()?);
    Ok(())
}
