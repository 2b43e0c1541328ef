use log::{debug, info};

use crate::client::cosmwasm::CosmWasmClient;

// One `Code` query per id. Any failure, not found or otherwise, counts as
// "no code with this id" so a single bad id never aborts the scan.
async fn created_by(client: &CosmWasmClient, code_id: u64, creator: &str) -> bool {
    match client.code_info(code_id).await {
        Ok(info) => info.creator == creator,
        Err(e) => {
            debug!("code id {}: {}", code_id, e);
            false
        }
    }
}

/// Every code id in `1..=max` uploaded by `creator`, ascending.
pub async fn find_codes_by_creator(client: &CosmWasmClient, creator: &str, max: u64) -> Vec<u64> {
    info!("Scanning code ids 1..={} for codes stored by {}", max, creator);

    let mut found = vec![];
    for code_id in 1..=max {
        if created_by(client, code_id, creator).await {
            found.push(code_id);
        }
    }
    found
}

/// Highest code id in `1..=max` uploaded by `creator`.
pub async fn latest_code_by_creator(
    client: &CosmWasmClient,
    creator: &str,
    max: u64,
) -> Option<u64> {
    info!("Scanning code ids {}..=1 for the latest code of {}", max, creator);

    for code_id in (1..=max).rev() {
        if created_by(client, code_id, creator).await {
            return Some(code_id);
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::client::chain_res::CodeInfo;
    use crate::client::error::ClientError;

    /// Chain with codes {3: A, 7: A, 9: B}, everything else is missing.
    pub(crate) fn stub_chain() -> CosmWasmClient {
        let mut client = CosmWasmClient::faux();
        faux::when!(client.code_info).then(|code_id| {
            let creator = match code_id {
                3 | 7 => "axm1creatora",
                9 => "axm1creatorb",
                _ => return Err(ClientError::CodeNotFound { code_id }),
            };
            Ok(CodeInfo {
                code_id,
                creator: creator.to_string(),
                data_hash: "AB12".to_string(),
            })
        });
        client
    }

    #[tokio::test]
    async fn finds_codes_in_ascending_order() {
        let client = stub_chain();

        assert_eq!(
            find_codes_by_creator(&client, "axm1creatora", 100).await,
            vec![3, 7]
        );
        assert_eq!(
            find_codes_by_creator(&client, "axm1creatorb", 100).await,
            vec![9]
        );
        assert!(find_codes_by_creator(&client, "axm1nobody", 100)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn scan_is_bounded() {
        let client = stub_chain();
        assert_eq!(
            find_codes_by_creator(&client, "axm1creatora", 5).await,
            vec![3]
        );
        assert!(find_codes_by_creator(&client, "axm1creatora", 0)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn latest_code_scans_downwards() {
        let client = stub_chain();

        assert_eq!(
            latest_code_by_creator(&client, "axm1creatora", 100).await,
            Some(7)
        );
        assert_eq!(
            latest_code_by_creator(&client, "axm1creatora", 6).await,
            Some(3)
        );
        assert_eq!(latest_code_by_creator(&client, "axm1nobody", 100).await, None);
    }
}
