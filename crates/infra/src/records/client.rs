use serde::{Deserialize, Serialize};

use prathabill_core::{ClientId, Entity};
use prathabill_parties::Client;

use super::Record;

/// Client row in the backend (`client` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: ClientId,
    pub client: Client,
}

impl Entity for ClientRecord {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Client search; an empty or missing needle lists everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    pub name_contains: Option<String>,
}

impl Record for ClientRecord {
    type Fields = Client;
    type Filter = ClientFilter;

    const KIND: &'static str = "client";

    fn new_id() -> ClientId {
        ClientId::new()
    }

    fn from_fields(id: ClientId, client: Client) -> Self {
        Self { id, client }
    }

    fn matches(&self, filter: &ClientFilter) -> bool {
        match filter.name_contains.as_deref() {
            Some(needle) if !needle.trim().is_empty() => self.client.name_contains(needle),
            _ => true,
        }
    }
}
