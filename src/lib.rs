//! Decision Tree Loan Prediction API Library
//!
//! Serves a pre-trained loan approval decision tree over HTTP. The tree is
//! loaded once at startup; when that fails the service keeps answering
//! liveness checks and returns structured errors for predictions.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `decision_tree`: Flat-array CART tree and its traversal.
//! - `errors`: Error handling types.
//! - `features`: Training-order feature vector assembly.
//! - `handlers`: HTTP request handlers.
//! - `model_store`: One-time artifact loading and degraded mode.
//! - `models`: Request and response models.
//! - `openapi`: OpenAPI document and Swagger UI.
//! - `router`: Route table and middleware.
//! - `services`: Prediction service.

pub mod config;
pub mod decision_tree;
pub mod errors;
pub mod features;
pub mod handlers;
pub mod model_store;
pub mod models;
pub mod openapi;
pub mod router;
pub mod services;
