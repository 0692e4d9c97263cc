// PIN registration
//
// `actRegister` on `accessControl` pairs this client with the set. The PIN
// shown on screen travels as an HTTP Basic credential with an empty user
// name (`":" + pin`); an empty PIN asks the set to display a new one. The
// answer carries the `auth` cookie that every later call relies on.

use secrecy::SecretString;
use serde_json::json;
use tracing::{debug, info};

use crate::client::{BraviaClient, CallOptions};
use crate::error::Error;
use crate::request::{RpcRequest, Service};

impl BraviaClient {
    /// Register with the set and obtain the session cookie.
    ///
    /// On success also fetches system information and turns on the set's
    /// Wake-on-LAN setting if it is off. Returns `false` when the set
    /// answers with an error object (wrong or missing PIN) or doesn't
    /// answer at all.
    pub async fn authenticate(
        &mut self,
        pin: &SecretString,
        client_id: &str,
        nickname: &str,
    ) -> Result<bool, Error> {
        self.session.cookies.clear();

        let request = RpcRequest::with_params(
            "actRegister",
            json!({ "clientid": client_id, "nickname": nickname, "level": "private" }),
        )
        .param(json!([{ "value": "yes", "function": "WOL" }]));

        debug!(client_id, nickname, "registering with {}", self.host());
        let reply = self
            .post_json(Service::AccessControl, &request, CallOptions::default(), Some(pin))
            .await?;

        if !reply.is_success() {
            debug!(error = ?reply.error, "registration rejected");
            return Ok(false);
        }

        self.get_system_info().await?;
        if self.get_wol_mode().await? != Some(true) {
            self.set_wol_mode(true).await?;
        }

        info!(host = self.host(), "registered with set");
        Ok(true)
    }
}
