mod search_filter;
mod user_record;

pub use search_filter::{SearchFilter, SearchFilterRecord};
pub use user_record::UserRecord;
