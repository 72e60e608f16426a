use tracing::info;

use prathabill_core::ClientId;
use prathabill_parties::Client;

use crate::records::{ClientFilter, ClientRecord, RecordError, SharedStore};
use crate::services::error::{Operation, ServiceError, ServiceResult};

/// Client directory over the client collaborator.
#[derive(Clone)]
pub struct ClientService {
    clients: SharedStore<ClientRecord>,
}

impl ClientService {
    pub fn new(clients: SharedStore<ClientRecord>) -> Self {
        Self { clients }
    }

    /// List clients whose name contains `search` (all clients when empty).
    pub async fn list(&self, search: &str) -> ServiceResult<Vec<ClientRecord>> {
        let filter = ClientFilter {
            name_contains: Some(search.to_string()).filter(|s| !s.trim().is_empty()),
        };
        self.clients
            .list(&filter)
            .await
            .map_err(ServiceError::remote(Operation::LoadClients))
    }

    pub async fn get(&self, id: ClientId) -> ServiceResult<Option<ClientRecord>> {
        self.clients
            .get_by_id(&id)
            .await
            .map_err(ServiceError::remote(Operation::LoadClient))
    }

    pub async fn create(&self, client: Client) -> ServiceResult<ClientRecord> {
        let op = Operation::CreateClient;
        let record = self
            .clients
            .create(vec![client])
            .await
            .map_err(ServiceError::remote(op))?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Remote {
                operation: op,
                source: RecordError::Rejected("backend returned no client record".to_string()),
            })?;

        info!(client_id = %record.id, "client created");
        Ok(record)
    }
}
