//! Paged map listings.

use super::beatmap::Beatmap;
use super::user::UserDetail;

crate::record! {
    /// One page of maps, optionally with the user they belong to.
    pub struct Page {
        docs: Vec<Beatmap> = required("docs"),
        user: UserDetail = optional("user"),
    }
}

crate::record! {
    /// One page of map search results.
    pub struct SearchPage {
        docs: Vec<Beatmap> = required("docs"),
        user: UserDetail = optional("user"),
    }
}

impl Page {
    /// Consumes the page and returns its maps.
    #[must_use]
    pub fn into_docs(self) -> Vec<Beatmap> {
        self.docs
    }
}
