//! The JSON envelope shared by every response, and the extractors that
//! report malformed bodies, path segments and query strings inside it.

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts},
  http::StatusCode,
};
use serde::Serialize;

use crate::error::ApiError;

/// `{success, data?, message?, error?}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<String>,
}

impl<T> Envelope<T> {
  pub fn data(data: T) -> Self {
    Self { success: true, data: Some(data), message: None, error: None }
  }

  pub fn failure(error: impl Into<String>) -> Self {
    Self { success: false, data: None, message: None, error: Some(error.into()) }
  }
}

impl Envelope<()> {
  pub fn message(message: impl Into<String>) -> Self {
    Self { success: true, data: None, message: Some(message.into()), error: None }
  }
}

pub type Reply<T> = Result<Json<Envelope<T>>, ApiError>;

pub type Created<T> = Result<(StatusCode, Json<Envelope<T>>), ApiError>;

pub fn ok<T>(data: T) -> Reply<T> { Ok(Json(Envelope::data(data))) }

pub fn created<T>(data: T) -> Created<T> { Ok((StatusCode::CREATED, Json(Envelope::data(data)))) }

pub fn done(message: impl Into<String>) -> Reply<()> { Ok(Json(Envelope::message(message))) }

/// [`axum::Json`] with its rejection rendered as a failure envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Payload<T>(pub T);

/// [`axum::extract::Path`] with its rejection rendered as a failure envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Id<T>(pub T);

/// [`axum::extract::Query`] with its rejection rendered as a failure envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Params<T>(pub T);
