//! User records.

crate::record! {
    /// Map counts per difficulty for one mapper.
    pub struct UserDiffStats {
        total: i32 = required("total"),
        easy: i32 = required("easy"),
        normal: i32 = required("normal"),
        hard: i32 = required("hard"),
        expert: i32 = required("expert"),
        expert_plus: i32 = required("expertPlus"),
    }
}

crate::record! {
    /// Aggregate mapping statistics for one user.
    pub struct UserStats {
        total_upvotes: i32 = required("totalUpvotes"),
        total_downvotes: i32 = required("totalDownvotes"),
        total_maps: i32 = required("totalMaps"),
        ranked_maps: i32 = required("rankedMaps"),
        avg_bpm: f32 = required("avgBpm"),
        avg_score: f32 = required("avgScore"),
        avg_duration: f32 = required("avgDuration"),
        first_upload: String = optional("firstUpload"),
        last_upload: String = optional("lastUpload"),
        diff_stats: UserDiffStats = required("diffStats"),
    }
}

crate::record! {
    /// A user of the service.
    pub struct UserDetail {
        id: i32 = required("id"),
        /// Display name.
        name: String = required("name"),
        hash: String = optional("hash"),
        /// Avatar image URL.
        avatar: String = required("avatar"),
        testplay: bool = optional("testplay"),
        /// Present on user lookups, absent on embedded uploader records.
        stats: UserStats = optional("stats"),
    }
}
