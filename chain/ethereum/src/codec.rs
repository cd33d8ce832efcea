use graph::ethabi::{self, Address, Hash, LogParam, RawLog, Token};
use graph::prelude::{BigInt, BlockHash, BlockNumber, BlockPtr, BlockTime};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::abi::EventKind;
use crate::trigger::{LinkFolioEvent, NoteLeft, PostCreated, ProfileDeleted, ProfileEvent};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decode {0} log: {1}")]
    Abi(&'static str, ethabi::Error),
    #[error("{event} log is missing parameter `{param}`")]
    MissingParam { event: &'static str, param: String },
    #[error("parameter `{param}` of {event} log should be {expected} but is {found}")]
    InvalidParam {
        event: &'static str,
        param: String,
        expected: &'static str,
        found: Token,
    },
}

/// A log as returned by `eth_getLogs`, extended with the timestamp of the
/// block that contains it. Quantities are accepted either as `0x`-prefixed
/// hex strings or as plain numbers.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    #[serde(deserialize_with = "de::address")]
    pub address: Address,
    #[serde(deserialize_with = "de::hashes")]
    pub topics: Vec<Hash>,
    #[serde(deserialize_with = "de::bytes")]
    pub data: Vec<u8>,
    #[serde(deserialize_with = "de::block_number")]
    pub block_number: BlockNumber,
    pub block_hash: BlockHash,
    #[serde(deserialize_with = "de::quantity")]
    pub block_timestamp: BlockTime,
    #[serde(deserialize_with = "de::quantity")]
    pub log_index: u64,
    #[serde(default, deserialize_with = "de::opt_hash")]
    pub transaction_hash: Option<Hash>,
}

impl Log {
    pub fn block_ptr(&self) -> BlockPtr {
        BlockPtr::new(self.block_hash.clone(), self.block_number)
    }
}

/// Decode `log` into a LinkFolio event. Logs whose `topic0` is not one of
/// the LinkFolio events are not an error and produce `None`; a log that
/// claims to be a LinkFolio event but does not decode is.
pub fn decode_log(log: &Log) -> Result<Option<LinkFolioEvent>, DecodeError> {
    let kind = match log.topics.first().and_then(EventKind::from_topic0) {
        Some(kind) => kind,
        None => return Ok(None),
    };

    let raw = RawLog {
        topics: log.topics.clone(),
        data: log.data.clone(),
    };
    let parsed = kind
        .event()
        .parse_log(raw)
        .map_err(|e| DecodeError::Abi(kind.name(), e))?;
    let mut params = Params {
        event: kind.name(),
        params: parsed.params,
    };

    let event = match kind {
        EventKind::ProfileCreated => LinkFolioEvent::ProfileCreated(params.profile()?),
        EventKind::ProfileUpdated => LinkFolioEvent::ProfileUpdated(params.profile()?),
        EventKind::ProfileDeleted => LinkFolioEvent::ProfileDeleted(ProfileDeleted {
            handle: params.string("handle")?,
        }),
        EventKind::NoteLeft => LinkFolioEvent::NoteLeft(NoteLeft {
            token_id: params.uint("tokenId")?,
            note_id: params.uint("noteId")?,
            author: params.address("author")?,
            handle: params.string("handle")?,
            content: params.string("content")?,
        }),
        EventKind::PostCreated => LinkFolioEvent::PostCreated(PostCreated {
            token_id: params.uint("tokenId")?,
            post_id: params.uint("postId")?,
            handle: params.string("handle")?,
            content: params.string("content")?,
        }),
    };
    Ok(Some(event))
}

/// The decoded parameters of one log, taken out by name
struct Params {
    event: &'static str,
    params: Vec<LogParam>,
}

impl Params {
    fn take(&mut self, name: &str) -> Result<Token, DecodeError> {
        let pos = self
            .params
            .iter()
            .position(|param| param.name == name)
            .ok_or_else(|| DecodeError::MissingParam {
                event: self.event,
                param: name.to_string(),
            })?;
        Ok(self.params.swap_remove(pos).value)
    }

    fn invalid(&self, name: &str, expected: &'static str, found: Token) -> DecodeError {
        DecodeError::InvalidParam {
            event: self.event,
            param: name.to_string(),
            expected,
            found,
        }
    }

    fn uint(&mut self, name: &str) -> Result<BigInt, DecodeError> {
        match self.take(name)? {
            Token::Uint(n) => Ok(BigInt::from_unsigned_u256(&n)),
            other => Err(self.invalid(name, "uint", other)),
        }
    }

    fn address(&mut self, name: &str) -> Result<Address, DecodeError> {
        match self.take(name)? {
            Token::Address(address) => Ok(address),
            other => Err(self.invalid(name, "address", other)),
        }
    }

    fn string(&mut self, name: &str) -> Result<String, DecodeError> {
        match self.take(name)? {
            Token::String(s) => Ok(s),
            other => Err(self.invalid(name, "string", other)),
        }
    }

    fn strings(&mut self, name: &str) -> Result<Vec<String>, DecodeError> {
        match self.take(name)? {
            Token::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Token::String(s) => Ok(s),
                    other => Err(self.invalid(name, "string[]", other)),
                })
                .collect(),
            other => Err(self.invalid(name, "string[]", other)),
        }
    }

    fn profile(&mut self) -> Result<ProfileEvent, DecodeError> {
        Ok(ProfileEvent {
            token_id: self.uint("tokenId")?,
            owner: self.address("owner")?,
            handle: self.string("handle")?,
            name: self.string("name")?,
            bio: self.string("bio")?,
            avatar: self.string("avatar")?,
            link_keys: self.strings("linkKeys")?,
            links: self.strings("links")?,
        })
    }
}

mod de {
    use super::*;
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quantity {
        Number(u64),
        Hex(String),
    }

    fn decode_hex<E: Error>(s: &str) -> Result<Vec<u8>, E> {
        hex::decode(s.trim_start_matches("0x"))
            .map_err(|e| E::custom(format!("invalid hex string `{}`: {}", s, e)))
    }

    fn fixed<E: Error>(s: &str, len: usize) -> Result<Vec<u8>, E> {
        let bytes = decode_hex::<E>(s)?;
        if bytes.len() != len {
            return Err(E::custom(format!(
                "expected {} bytes but `{}` has {}",
                len,
                s,
                bytes.len()
            )));
        }
        Ok(bytes)
    }

    pub fn address<'de, D: Deserializer<'de>>(d: D) -> Result<Address, D::Error> {
        let s = String::deserialize(d)?;
        Ok(Address::from_slice(&fixed::<D::Error>(&s, 20)?))
    }

    pub fn hashes<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Hash>, D::Error> {
        Vec::<String>::deserialize(d)?
            .iter()
            .map(|s| fixed::<D::Error>(s, 32).map(|bytes| Hash::from_slice(&bytes)))
            .collect()
    }

    pub fn opt_hash<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Hash>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|s| fixed::<D::Error>(&s, 32).map(|bytes| Hash::from_slice(&bytes)))
            .transpose()
    }

    pub fn bytes<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        decode_hex::<D::Error>(&s)
    }

    pub fn quantity<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        match Quantity::deserialize(d)? {
            Quantity::Number(n) => Ok(n),
            Quantity::Hex(s) => u64::from_str_radix(s.trim_start_matches("0x"), 16)
                .map_err(|e| D::Error::custom(format!("invalid quantity `{}`: {}", s, e))),
        }
    }

    pub fn block_number<'de, D: Deserializer<'de>>(d: D) -> Result<BlockNumber, D::Error> {
        let n = quantity(d)?;
        BlockNumber::try_from(n)
            .map_err(|_| D::Error::custom(format!("block number {} is out of range", n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_numeric_quantities() {
        let line = r#"{
            "address": "0x00000000000000000000000000000000000000aa",
            "topics": [],
            "data": "0x",
            "blockNumber": "0x10",
            "blockHash": "0x0000000000000000000000000000000000000000000000000000000000000001",
            "blockTimestamp": 1700000000,
            "logIndex": "0x2"
        }"#;
        let log: Log = serde_json::from_str(line).unwrap();

        assert_eq!(16, log.block_number);
        assert_eq!(1_700_000_000, log.block_timestamp);
        assert_eq!(2, log.log_index);
        assert_eq!(None, log.transaction_hash);
        assert_eq!(Address::from_low_u64_be(0xaa), log.address);
    }

    #[test]
    fn rejects_short_addresses() {
        let line = r#"{
            "address": "0xaa",
            "topics": [],
            "data": "0x",
            "blockNumber": 1,
            "blockHash": "0x01",
            "blockTimestamp": 1,
            "logIndex": 0
        }"#;
        assert!(serde_json::from_str::<Log>(line).is_err());
    }

    #[test]
    fn unknown_topic_is_skipped() {
        let log = Log {
            address: Address::zero(),
            topics: vec![Hash::repeat_byte(7)],
            data: vec![],
            block_number: 1,
            block_hash: BlockHash::zero(),
            block_timestamp: 1,
            log_index: 0,
            transaction_hash: None,
        };
        assert_eq!(None, decode_log(&log).unwrap());
    }

    #[test]
    fn bad_payload_for_known_topic_fails() {
        let log = Log {
            address: Address::zero(),
            topics: vec![EventKind::ProfileDeleted.signature()],
            data: vec![1, 2, 3],
            block_number: 1,
            block_hash: BlockHash::zero(),
            block_timestamp: 1,
            log_index: 0,
            transaction_hash: None,
        };
        assert!(matches!(
            decode_log(&log),
            Err(DecodeError::Abi("ProfileDeleted", _))
        ));
    }
}
