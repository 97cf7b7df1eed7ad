pub mod profile_url;
