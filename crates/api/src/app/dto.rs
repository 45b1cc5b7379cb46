use serde::Deserialize;

use clientsvc_clients::ClientFields;

// -------------------------
// Request DTOs
// -------------------------

/// Body shape shared by create and update.
///
/// Carries no id field: create generates a fresh one and update takes it
/// from the path, so any id supplied by the caller is ignored either way.
#[derive(Debug, Deserialize)]
pub struct ClientRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl From<ClientRequest> for ClientFields {
    fn from(body: ClientRequest) -> Self {
        ClientFields {
            name: body.name,
            phone: body.phone,
            email: body.email,
            comment: body.comment,
        }
    }
}

/// Query parameters for the list endpoint.
///
/// Kept as raw strings so a failing parse can name the offending
/// parameter in the response.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}
