//! Request helper extensions.

use salvo::prelude::Request;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::ApiError;

/// Message returned when a JSON body is missing or does not match its schema.
pub(crate) const INVALID_BODY_MESSAGE: &str = "Invalid request body";

pub(crate) trait RequestExt {
    /// Parse the JSON body, answering `400 invalid_argument` with `message` when it is missing,
    /// not JSON, or the wrong shape.
    async fn json_or_400<T: DeserializeOwned + Send>(
        &mut self,
        message: &'static str,
    ) -> Result<T, ApiError>;
}

impl RequestExt for Request {
    async fn json_or_400<T: DeserializeOwned + Send>(
        &mut self,
        message: &'static str,
    ) -> Result<T, ApiError> {
        self.parse_json::<T>().await.map_err(|error| {
            debug!(error = %error, "rejected request body");

            ApiError::invalid_argument(message)
        })
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde::Deserialize;
    use serde_json::json;
    use testresult::TestResult;

    use crate::errors::ErrorBody;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Quantity {
        quantity: i64,
    }

    #[salvo::handler]
    async fn parse(req: &mut Request, res: &mut Response) {
        match req.json_or_400::<Quantity>(INVALID_BODY_MESSAGE).await {
            Ok(body) => res.render(Text::Plain(body.quantity.to_string())),
            Err(error) => res.render(error),
        }
    }

    #[tokio::test]
    async fn well_formed_body_is_parsed() -> TestResult {
        let service = Service::new(Router::new().post(parse));

        let mut res = TestClient::post("http://example.com")
            .json(&json!({ "quantity": 2 }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "2");

        Ok(())
    }

    #[tokio::test]
    async fn missing_or_mistyped_body_is_a_json_400() -> TestResult {
        let service = Service::new(Router::new().post(parse));

        let requests = [
            TestClient::post("http://example.com"),
            TestClient::post("http://example.com").json(&json!({ "quantity": "two" })),
            TestClient::post("http://example.com").raw_json("{not json"),
        ];

        for request in requests {
            let mut res = request.send(&service).await;

            let body: ErrorBody = res.take_json().await?;

            assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
            assert_eq!(body.code, "invalid_argument");
            assert_eq!(body.message, INVALID_BODY_MESSAGE);
        }

        Ok(())
    }
}
