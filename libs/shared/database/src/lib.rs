pub mod supabase;

pub use supabase::{http_client, SupabaseClient};
