use std::time::Duration;

use etcd_client::{Client, ConnectOptions};

use super::{Error, Result, StoreConnector, StoreSession};
use crate::config::EtcdConfig;

/// Opens authenticated clients to an etcd cluster.
#[derive(Debug, Clone)]
pub struct EtcdConnector {
    endpoints: Vec<String>,
    credentials: Option<(String, String)>,
    dial_timeout: Duration,
}

impl EtcdConnector {
    pub fn new(config: &EtcdConfig) -> Self {
        Self {
            endpoints: config.endpoints.clone(),
            credentials: config
                .credentials()
                .map(|(user, password)| (user.to_owned(), password.to_owned())),
            dial_timeout: config.dial_timeout,
        }
    }

    fn options(&self) -> ConnectOptions {
        let options = ConnectOptions::new()
            .with_connect_timeout(self.dial_timeout)
            .with_timeout(self.dial_timeout);
        match &self.credentials {
            Some((user, password)) => options.with_user(user.clone(), password.clone()),
            None => options,
        }
    }

    fn timed_out(&self) -> Error {
        Error::ConnectTimeout {
            endpoints: self.endpoints.clone(),
            timeout: self.dial_timeout,
        }
    }
}

impl StoreConnector for EtcdConnector {
    type Session = EtcdSession;

    /// Connects and asks the cluster for its status, so that an unreachable cluster is reported
    /// here rather than on the first write.
    async fn connect(&self) -> Result<EtcdSession> {
        let connect_err = |source: etcd_client::Error| Error::Connect {
            endpoints: self.endpoints.clone(),
            source,
        };
        let mut client = tokio::time::timeout(
            self.dial_timeout,
            Client::connect(self.endpoints.clone(), Some(self.options())),
        )
        .await
        .map_err(|_| self.timed_out())?
        .map_err(connect_err)?;

        let status = tokio::time::timeout(self.dial_timeout, client.status())
            .await
            .map_err(|_| self.timed_out())?
            .map_err(connect_err)?;
        log::debug!(
            "etcd client initialized (server version {})",
            status.version()
        );
        Ok(EtcdSession { client })
    }
}

pub struct EtcdSession {
    client: Client,
}

impl StoreSession for EtcdSession {
    async fn put(&mut self, key: &str, value: String) -> Result<()> {
        self.client
            .put(key, value, None)
            .await
            .map_err(|source| Error::Put {
                key: key.to_owned(),
                source,
            })?;
        Ok(())
    }

    async fn close(self) -> Result<()> {
        // The client has no explicit shutdown, dropping it closes the channel.
        drop(self.client);
        log::debug!("etcd client closed");
        Ok(())
    }
}
