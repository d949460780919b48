pub mod gotrue;
pub mod supabase;

pub use gotrue::GoTrueProvider;
pub use supabase::SupabaseClient;
