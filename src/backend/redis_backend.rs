//! Redis Backend
//!
//! Blocking Redis connection implementing [`KvBackend`].

use redis::{Commands, Connection};
use tracing::debug;

use crate::backend::KvBackend;
use crate::config::Config;
use crate::error::Result;

// == Redis Backend ==
/// A single blocking connection to a Redis server.
pub struct RedisBackend {
    connection: Connection,
}

impl RedisBackend {
    // == Constructor ==
    /// Opens a connection to the server addressed by `config`.
    pub fn connect(config: &Config) -> Result<Self> {
        let url = config.redis_url();
        debug!("Connecting to {}", url);
        let client = redis::Client::open(url)?;
        let connection = client.get_connection()?;
        Ok(Self::from_connection(connection))
    }

    /// Wraps an already established connection.
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }
}

impl KvBackend for RedisBackend {
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.connection.set::<_, _, ()>(key, value)?;
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.connection.get(key)?)
    }

    fn incr(&mut self, key: &str) -> Result<i64> {
        Ok(self.connection.incr(key, 1)?)
    }

    fn rpush(&mut self, key: &str, value: &[u8]) -> Result<usize> {
        Ok(self.connection.rpush(key, value)?)
    }

    fn rpush_pair(
        &mut self,
        inputs_key: &str,
        input: &[u8],
        outputs_key: &str,
        output: &[u8],
    ) -> Result<usize> {
        // MULTI/EXEC so concurrent writers cannot interleave between the pushes
        let (_, logged): (usize, usize) = redis::pipe()
            .atomic()
            .rpush(inputs_key, input)
            .rpush(outputs_key, output)
            .query(&mut self.connection)?;
        Ok(logged)
    }

    fn lrange(&mut self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        Ok(self.connection.lrange(key, start, stop)?)
    }

    fn flush_db(&mut self) -> Result<()> {
        redis::cmd("FLUSHDB").query::<()>(&mut self.connection)?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend").finish_non_exhaustive()
    }
}
