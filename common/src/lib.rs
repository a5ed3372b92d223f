//! Wire types shared by the outfit ranker backend and its clients.

pub mod model;
pub mod requests;
pub mod responses;
