//! Redis transport.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tokio::time::{MissedTickBehavior, interval, timeout};

use super::{CacheLink, CacheTransport};
use crate::{CacheConfig, Error, Result, TRACING_TARGET_CONNECTION};

/// Connects to Redis over a multiplexed async connection.
#[derive(Debug, Clone)]
pub struct RedisTransport {
    client: redis::Client,
    connect_timeout: Duration,
    ping_interval: Duration,
}

impl RedisTransport {
    /// Creates a transport from configuration.
    ///
    /// Only validates the URL; no connection is made until the driver asks.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let client = redis::Client::open(config.cache_service_url.as_str())
            .map_err(|err| Error::invalid_config(err.to_string()))?;

        Ok(Self {
            client,
            connect_timeout: config.connect_timeout(),
            ping_interval: config.ping_interval(),
        })
    }
}

#[async_trait]
impl CacheTransport for RedisTransport {
    type Link = RedisLink;

    async fn connect(&self) -> Result<RedisLink> {
        let mut connection = timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| Error::Timeout {
            timeout: self.connect_timeout,
        })??;

        // A fresh connection is only trusted once it answers.
        let pong: String = redis::cmd("PING").query_async(&mut connection).await?;

        tracing::debug!(
            target: TRACING_TARGET_CONNECTION,
            reply = %pong,
            "Redis link established"
        );

        Ok(RedisLink {
            connection,
            ping_interval: self.ping_interval,
        })
    }
}

/// A live Redis connection supervised by a periodic `PING`.
pub struct RedisLink {
    connection: MultiplexedConnection,
    ping_interval: Duration,
}

#[async_trait]
impl CacheLink for RedisLink {
    async fn failed(&mut self) -> Error {
        let mut ticker = interval(self.ping_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let ping = async {
                let _: String = redis::cmd("PING")
                    .query_async(&mut self.connection)
                    .await?;
                Ok::<_, redis::RedisError>(())
            };

            match timeout(self.ping_interval, ping).await {
                Ok(Ok(())) => {
                    tracing::trace!(target: TRACING_TARGET_CONNECTION, "Redis heartbeat ok");
                }
                Ok(Err(err)) => return Error::Connection(err),
                Err(_) => {
                    return Error::Timeout {
                        timeout: self.ping_interval,
                    };
                }
            }
        }
    }

    async fn quit(&mut self) -> Result<()> {
        let _: () = redis::cmd("QUIT").query_async(&mut self.connection).await?;
        Ok(())
    }
}
