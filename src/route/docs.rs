use std::sync::Arc;

use aide::{
	axum::{
		routing::{get, get_with},
		ApiRouter, IntoApiResponse,
	},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{response::IntoResponse, Extension};

use crate::{extract::Json, AppState};

pub const SPEC_PATH: &str = "/docs/private/api.json";

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new()
		.api_route(
			"/",
			get_with(
				Scalar::new(SPEC_PATH).with_title("Bloglist").axum_handler(),
				|op| op.description("This documentation page."),
			),
		)
		.route("/private/api.json", get(serve_docs))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api.as_ref()).into_response()
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_openapi_document() {
		let app = TestApp::new();

		let response = app.server.get(super::SPEC_PATH).await;
		response.assert_status_ok();

		let api = response.json::<serde_json::Value>();
		assert_eq!(api["info"]["title"], "Bloglist");
		assert!(api["paths"]["/api/blogs/{id}"]["delete"]["security"].is_array());
		assert!(api["paths"]["/api/blogs/{id}"]["get"]["security"].is_null());
		assert!(api["components"]["securitySchemes"]["Bearer"].is_object());
	}

	#[tokio::test]
	async fn test_reference_page() {
		let app = TestApp::new();

		let response = app.server.get("/docs").await;
		response.assert_status_ok();
		assert!(response.text().to_lowercase().contains("<html"));
	}
}
