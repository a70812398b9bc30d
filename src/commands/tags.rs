//! Known search tags.

use beatsaver_core::api::{genre_tags, map_feel_tags};

pub fn run_tags_command() {
    println!("Map feel: {}", map_feel_tags().join(", "));
    println!("Genres:   {}", genre_tags().join(", "));
}
