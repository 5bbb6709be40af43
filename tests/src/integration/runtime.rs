//! # Runtime Replay
//!
//! Drives the forge runtime with JSON scripts, the way the binary does.

#[cfg(test)]
mod tests {
    use crate::fixture::{ALICE, BOB, VALIDATOR_KEY};
    use forge_runtime::config::load_from;
    use forge_runtime::{parse_script, ForgeRuntime};
    use rm_02_monster_minting::prelude::*;
    use shared_types::U256;

    const NOW: u64 = 1_800_000_000;

    fn runtime() -> ForgeRuntime {
        let config = load_from(|name| match name {
            "RM_SIGNER_KEY" => Some(VALIDATOR_KEY.to_string()),
            "RM_TREASURY" => Some("0x7e7e7e7e7e7e7e7e7e7e7e7e7e7e7e7e7e7e7e7e".to_string()),
            _ => None,
        })
        .unwrap();
        ForgeRuntime::new(config, NOW).unwrap()
    }

    #[tokio::test]
    async fn test_hash_season_script() {
        let script = format!(
            r#"[
                {{"op": "issue_hash", "kind": "general", "id": 3, "owner": "{ALICE}", "group": 1, "detail": 1}},
                {{"op": "mint", "caller": "{ALICE}", "source": "GENERAL_HASH", "use_index": 3}},
                {{"op": "mint", "caller": "{ALICE}", "source": "GENERAL_HASH", "use_index": 3}},
                {{"op": "mint", "caller": "{ALICE}", "source": "GENERAL_HASH", "use_index": 3}},
                {{"op": "mint", "caller": "{ALICE}", "source": "GENERAL_HASH", "use_index": 3}},
                {{"op": "transfer_hash", "kind": "general", "id": 3, "to": "{BOB}"}},
                {{"op": "tokens_of", "owner": "{ALICE}"}}
            ]"#
        );
        let steps = parse_script(&script).unwrap();
        let rt = runtime();
        let report = rt.replay(&steps).await;

        assert_eq!(report.outcomes[4].kind, Some("ineligible"));
        assert!(report.outcomes[5].is_ok());
        assert_eq!(
            report.outcomes[6].value,
            Some(serde_json::json!({ "tokens": [1, 2, 3] }))
        );
        assert!(rt.forge().general.hash_of(3).unwrap().retired);
    }

    #[tokio::test]
    async fn test_expired_proof_in_script() {
        let script = format!(
            r#"[
                {{"op": "assign_external", "id": 1, "owner": "{ALICE}"}},
                {{"op": "mint", "caller": "{ALICE}", "source": "EXTERNAL_ENTRY", "use_index": 1, "expiry": {}}},
                {{"op": "advance_time", "secs": 100}},
                {{"op": "mint", "caller": "{ALICE}", "source": "EXTERNAL_ENTRY", "use_index": 1, "expiry": {}}}
            ]"#,
            NOW + 50,
            NOW + 50
        );
        let report = runtime().replay(&parse_script(&script).unwrap()).await;

        assert!(report.outcomes[1].is_ok());
        assert_eq!(report.outcomes[3].kind, Some("expired_authorization"));
    }

    #[tokio::test]
    async fn test_insufficient_funds_in_script() {
        let script = format!(
            r#"[
                {{"op": "credit_currency", "owner": "{ALICE}", "amount": "0x10"}},
                {{"op": "assign_external", "id": 1, "owner": "{ALICE}"}},
                {{"op": "mint", "caller": "{ALICE}", "source": "EXTERNAL_ENTRY", "use_index": 1, "cost": "0x20"}}
            ]"#
        );
        let rt = runtime();
        let report = rt.replay(&parse_script(&script).unwrap()).await;

        assert_eq!(report.outcomes[2].kind, Some("insufficient_funds"));
        assert_eq!(rt.forge().currency.balance_of(ALICE), U256::from(16));
        assert!(report.events.is_empty());
    }
}
