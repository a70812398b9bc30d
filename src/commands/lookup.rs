//! Single-record lookups: map by key or hash, user by id or name.

use anyhow::Result;
use beatsaver_core::BeatSaverClient;

use super::render;

pub async fn run_map_command(client: &BeatSaverClient, key: &str) -> Result<()> {
    let map = client.beatmap_by_key(key).await?;
    print!("{}", render::map_detail(&map));
    Ok(())
}

pub async fn run_hash_command(client: &BeatSaverClient, hash: &str) -> Result<()> {
    let map = client.beatmap_by_hash(hash).await?;
    print!("{}", render::map_detail(&map));
    Ok(())
}

/// Numeric arguments are looked up as ids, anything else as a name.
pub async fn run_user_command(client: &BeatSaverClient, user: &str) -> Result<()> {
    let detail = match user.parse::<i32>() {
        Ok(id) => client.user_by_id(id).await?,
        Err(_) => client.user_by_name(user).await?,
    };
    print!("{}", render::user_detail(&detail));
    Ok(())
}
