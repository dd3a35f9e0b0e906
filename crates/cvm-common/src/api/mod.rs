pub mod match_request;
pub mod match_response;

pub use match_request::{CvMatchingRequest, JobMatchingRequest};
pub use match_response::{CandidateMatch, JobMatch, MatchScores, MatchingResponse};
