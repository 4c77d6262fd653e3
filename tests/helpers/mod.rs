// Test Helper Modules for HTTP contract and integration tests
//
// Every server runs the full middleware stack over the in-memory store, so
// no database is needed.
//
// Usage (from a test crate):
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;
//
// Example:
//   #[actix_web::test]
//   async fn test_health() {
//       let srv = spawn_test_server().await;
//       let response = srv.get("/health").send().await.unwrap();
//       assert_status(&response, StatusCode::OK);
//   }

#![allow(dead_code)]

pub mod test_client;
pub mod test_data;

// Re-export commonly used types and functions
pub use assertions::*;
pub use test_client::*;
pub use test_data::*;
pub use test_server::*;
