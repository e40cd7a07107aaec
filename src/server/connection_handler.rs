use crate::domain::LocationRecord;
use crate::server::location_payload::{LocationPayload, PayloadError};
use crate::store::LocationStore;
use chrono::Local;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

#[derive(Clone, Debug)]
pub struct HandlerConfig {
    /// Upper bound of the single read, anything beyond it is cut off.
    pub buffer_size: usize,
    pub read_timeout: Duration,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        HandlerConfig {
            buffer_size: 4096,
            read_timeout: Duration::from_secs(30),
        }
    }
}

/// Consumes the one report a device sends per connection and closes the connection.
///
/// Nothing is ever written back. A report that cannot be read or parsed is dropped, which only shows up in the debug
/// log. The socket is owned by this function, so it is closed on every return path.
#[instrument(skip_all, fields(%address))]
pub async fn handle_connection(mut socket: TcpStream, address: SocketAddr, store: LocationStore, config: HandlerConfig) {
    match receive_record(&mut socket, &config).await {
        Ok(record) => {
            info!(device_id = record.device_id, "📍 Received location {:.6}, {:.6}", record.latitude, record.longitude);
            store.append(record).await;
        }
        Err(e) => debug!("🗑️ Discarded report: {}", e),
    }
}

async fn receive_record<R>(reader: &mut R, config: &HandlerConfig) -> Result<LocationRecord, ConnectionError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; config.buffer_size];
    let read = timeout(config.read_timeout, reader.read(&mut buffer))
        .await
        .map_err(|_| ConnectionError::Timeout(config.read_timeout))??;

    if read == 0 {
        return Err(ConnectionError::Empty);
    }

    let received_at = Local::now();
    let payload = LocationPayload::parse(&buffer[..read])?;
    Ok(payload.into_record(&received_at))
}

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("no data within {0:?}")]
    Timeout(Duration),
    #[error("connection closed without data")]
    Empty,
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::date_time_ext::REPORT_TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;
    use test_log::test;
    use tokio::io::{AsyncWriteExt, duplex};

    fn config() -> HandlerConfig {
        HandlerConfig {
            buffer_size: 64,
            read_timeout: Duration::from_millis(200),
        }
    }

    #[test(tokio::test)]
    async fn receives_a_record_from_a_single_read() -> Result<(), ConnectionError> {
        let (mut client, mut server) = duplex(1024);
        client.write_all(br#"{"latitude": 1.5, "longitude": 2.5, "device_id": "phone1"}"#).await?;

        let record = receive_record(&mut server, &config()).await?;

        assert_eq!(record.latitude, 1.5);
        assert_eq!(record.longitude, 2.5);
        assert_eq!(record.device_id, "phone1");
        Ok(())
    }

    #[test(tokio::test)]
    async fn defaults_the_timestamp_to_the_time_of_receipt() -> Result<(), ConnectionError> {
        let (mut client, mut server) = duplex(1024);
        client.write_all(br#"{"latitude": 1.5, "longitude": 2.5}"#).await?;

        let before = Local::now().naive_local();
        let record = receive_record(&mut server, &config()).await?;
        let after = Local::now().naive_local();

        let timestamp = NaiveDateTime::parse_from_str(&record.timestamp, REPORT_TIMESTAMP_FORMAT).expect("timestamp format");
        assert!(timestamp >= before - chrono::Duration::seconds(1), "{} is before {}", timestamp, before);
        assert!(timestamp <= after, "{} is after {}", timestamp, after);
        assert_eq!(record.device_id, "Unknown");
        Ok(())
    }

    #[test(tokio::test)]
    async fn payloads_larger_than_the_buffer_are_truncated_and_discarded() -> Result<(), ConnectionError> {
        let (mut client, mut server) = duplex(1024);
        let device_id = "x".repeat(100);
        client
            .write_all(format!(r#"{{"latitude": 1.5, "longitude": 2.5, "device_id": "{}"}}"#, device_id).as_bytes())
            .await?;

        let result = receive_record(&mut server, &config()).await;

        assert!(matches!(result, Err(ConnectionError::Payload(PayloadError::Json(_)))));
        Ok(())
    }

    #[test(tokio::test)]
    async fn a_closed_connection_without_data_is_empty() {
        let (client, mut server) = duplex(1024);
        drop(client);

        let result = receive_record(&mut server, &config()).await;

        assert!(matches!(result, Err(ConnectionError::Empty)));
    }

    #[test(tokio::test)]
    async fn a_silent_client_times_out() {
        let (_client, mut server) = duplex(1024);

        let result = receive_record(&mut server, &config()).await;

        assert!(matches!(result, Err(ConnectionError::Timeout(_))));
    }
}
