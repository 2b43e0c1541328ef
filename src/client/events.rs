//! Pulls `code_id` and contract addresses out of transaction results.
//!
//! The event layout depends on the chain and wasmd version: attribute keys
//! drift between spellings and some nodes only return the events inside the
//! JSON encoded raw log. Every spelling listed here is treated as equally
//! authoritative, and extraction walks an ordered list of strategies, taking
//! the first one that yields a value.

use serde_json::Value;
use std::future::Future;

use super::chain_res::ChainResponse;

pub const STORE_CODE_EVENT: &str = "store_code";
pub const INSTANTIATE_EVENT: &str = "instantiate";

pub const CODE_ID_KEYS: &[&str] = &["code_id", "codeId", "code.id"];
pub const CONTRACT_ADDRESS_KEYS: &[&str] = &["_contract_address", "contract_address"];

/// One way of reading a value out of a transaction result.
pub type Extractor<T> = fn(&ChainResponse) -> Option<T>;

pub const CODE_ID_STRATEGIES: &[Extractor<u64>] = &[code_id_from_events, code_id_from_raw_log];

pub const CONTRACT_ADDRESS_STRATEGIES: &[Extractor<String>] =
    &[contract_address_from_events, contract_address_from_raw_log];

/// Applies `strategies` in order and returns the first hit.
pub fn first_match<T>(res: &ChainResponse, strategies: &[Extractor<T>]) -> Option<T> {
    strategies.iter().find_map(|extract| extract(res))
}

/// Like [first_match], but when every local strategy misses, fetches the
/// transaction again through `requery` and retries on the fresh result.
pub async fn resolve<T, F, Fut>(
    res: &ChainResponse,
    strategies: &[Extractor<T>],
    requery: F,
) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Option<ChainResponse>>,
{
    if let Some(v) = first_match(res, strategies) {
        return Some(v);
    }

    let fresh = requery().await?;
    first_match(&fresh, strategies)
}

pub fn code_id_from_events(res: &ChainResponse) -> Option<u64> {
    attr_from_events(res, STORE_CODE_EVENT, CODE_ID_KEYS).and_then(|v| v.parse().ok())
}

pub fn code_id_from_raw_log(res: &ChainResponse) -> Option<u64> {
    attr_from_raw_log(&res.log, STORE_CODE_EVENT, CODE_ID_KEYS).and_then(|v| v.parse().ok())
}

pub fn contract_address_from_events(res: &ChainResponse) -> Option<String> {
    attr_from_events(res, INSTANTIATE_EVENT, CONTRACT_ADDRESS_KEYS)
}

pub fn contract_address_from_raw_log(res: &ChainResponse) -> Option<String> {
    attr_from_raw_log(&res.log, INSTANTIATE_EVENT, CONTRACT_ADDRESS_KEYS)
}

fn attr_from_events(res: &ChainResponse, kind: &str, keys: &[&str]) -> Option<String> {
    res.events
        .iter()
        .filter(|e| e.kind == kind)
        .find_map(|e| e.attr(keys))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parses the raw log as JSON and searches every nested `{"type", "attributes"}` object.
/// Logs that aren't JSON (plain error strings, empty logs on newer SDKs) yield `None`.
fn attr_from_raw_log(log: &str, kind: &str, keys: &[&str]) -> Option<String> {
    let json: Value = serde_json::from_str(log).ok()?;
    find_attr(&json, kind, keys)
}

fn find_attr(v: &Value, kind: &str, keys: &[&str]) -> Option<String> {
    match v {
        Value::Array(items) => items.iter().find_map(|i| find_attr(i, kind, keys)),
        Value::Object(obj) => {
            if obj.get("type").and_then(Value::as_str) == Some(kind) {
                let hit = obj
                    .get("attributes")
                    .and_then(Value::as_array)
                    .into_iter()
                    .flatten()
                    .find_map(|a| {
                        let key = a.get("key").and_then(Value::as_str)?;
                        if !keys.contains(&key) {
                            return None;
                        }
                        match a.get("value")? {
                            Value::String(s) if !s.is_empty() => Some(s.clone()),
                            Value::Number(n) => Some(n.to_string()),
                            _ => None,
                        }
                    });
                if hit.is_some() {
                    return hit;
                }
            }
            obj.values().find_map(|child| find_attr(child, kind, keys))
        }
        _ => None,
    }
}
