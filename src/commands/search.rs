//! Map listings: text search and newest maps.

use anyhow::Result;
use beatsaver_core::{BeatSaverClient, Beatmap, LatestQueryOptions, SearchQueryOptions};

use super::render;
use crate::cli::{LatestArgs, SearchArgs};

pub async fn run_search_command(client: &BeatSaverClient, args: &SearchArgs) -> Result<()> {
    let options = SearchQueryOptions {
        query: args.query.clone(),
        sort_order: args.sort.into(),
        include_tags: args.tags.clone(),
        exclude_tags: args.exclude_tags.clone(),
        ..SearchQueryOptions::default()
    };
    let page = client.search(args.page, &options).await?;
    print_maps(page.docs());
    Ok(())
}

pub async fn run_latest_command(client: &BeatSaverClient, args: &LatestArgs) -> Result<()> {
    let options = LatestQueryOptions {
        page_size: Some(args.page_size),
        sort_order: args.sort.map(Into::into),
        ..LatestQueryOptions::default()
    };
    let page = client.latest(&options).await?;
    print_maps(page.docs());
    Ok(())
}

fn print_maps(maps: &[Beatmap]) {
    if maps.is_empty() {
        println!("No maps found.");
        return;
    }
    for map in maps {
        println!("{}", render::map_row(map));
    }
}
