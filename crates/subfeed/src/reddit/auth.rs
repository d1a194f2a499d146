use crate::prelude::*;
use subfeed_core::reddit::auth::{parse_token_response, token_request};
use subfeed_core::reddit::config::Credentials;
use subfeed_core::reddit::AccessToken;

/// Exchange application credentials for a bearer token
///
/// Returns `Ok(None)` without touching the network when any credential is
/// missing. Every failure is fatal to initialization.
pub async fn fetch_access_token(
    client: &reqwest::Client,
    auth_base: &str,
    credentials: &Credentials,
) -> Result<Option<AccessToken>, Error> {
    use base64::Engine;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

    let Some(request) = token_request(credentials) else {
        return Ok(None);
    };

    log::info!(
        "Found reddit API credentials: app-name={} client-id={}",
        credentials.app_name,
        credentials.client_id
    );

    let auth_string = format!("{}:{}", request.username, request.password);
    let auth_encoded = base64::engine::general_purpose::STANDARD.encode(&auth_string);

    let response = client
        .post(format!("{auth_base}{}", request.path))
        .header(AUTHORIZATION, format!("Basic {auth_encoded}"))
        .header(USER_AGENT, &request.user_agent)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .form(&request.form)
        .send()
        .await
        .map_err(|e| Error::CredentialExchange(f!("querying Reddit API: {e}")))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| Error::CredentialExchange(f!("reading response body: {e}")))?;

    let (token, details) = parse_token_response(status, &body)?;

    if token.secret().is_empty() {
        log::warn!("token endpoint returned an empty access token, using the public API");
        return Ok(None);
    }

    log::info!(
        "Successfully fetched Reddit access token (type={}, expires_in={}s, not refreshed)",
        details.token_type,
        details.expires_in
    );

    Ok(Some(token))
}
