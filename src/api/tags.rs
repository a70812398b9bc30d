//! Known search tags.
//!
//! These lists are a snapshot of the tags the service offered at one point;
//! tags may have been added or retired since.

/// Map feel tags.
pub const MAP_FEEL_TAGS: &[&str] = &[
    "Accuracy",
    "Balanced",
    "Challenge",
    "Dance",
    "Fitness",
    "Speed",
    "Tech",
];

/// Genre tags.
pub const GENRE_TAGS: &[&str] = &[
    "Alternative",
    "Ambient",
    "Anime",
    "Classic & Orchestral",
    "Comedy & Meme",
    "Dance",
    "Drum and Bass",
    "Dubstep",
    "Electronic",
    "Folk & Acoustic",
    "Funk & Disco",
    "Hardcore",
    "Hip Hop & Rap",
    "Holiday",
    "House",
    "Indie",
    "Instrumental",
    "J-Pop",
    "J-Rock",
    "Jazz",
    "K-Pop",
    "Kids & Family",
    "Metal",
    "Nightcore",
    "Pop",
    "Punk",
    "R&B",
    "Rock",
    "Soul",
    "SpeedCore",
    "Swing",
    "TV & Film",
    "Techno",
    "Trance",
    "Video Game",
    "Vocaloid",
];

/// Returns the known map feel tags.
#[must_use]
pub fn map_feel_tags() -> &'static [&'static str] {
    MAP_FEEL_TAGS
}

/// Returns the known genre tags.
#[must_use]
pub fn genre_tags() -> &'static [&'static str] {
    GENRE_TAGS
}
