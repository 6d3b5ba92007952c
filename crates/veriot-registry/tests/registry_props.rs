//! Property tests for registry semantics.

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use proptest::prelude::*;
use std::future::Future;
use veriot_effects::MemoryLedgerHandler;
use veriot_registry::{
    DataRecord, DataRecordStore, Device, DeviceRegistry, DeviceStatus, LedgerEntity,
    RecordStatus, RegistryError, VerificationWorkflow,
};

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(future)
}

fn device_id() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}"
}

fn text() -> impl Strategy<Value = String> {
    "[ -~]{0,24}"
}

fn record_status() -> impl Strategy<Value = RecordStatus> {
    prop_oneof![
        Just(RecordStatus::Pending),
        Just(RecordStatus::Verified),
        Just(RecordStatus::Rejected),
    ]
}

fn device() -> impl Strategy<Value = Device> {
    (
        device_id(),
        text(),
        text(),
        prop_oneof![Just(DeviceStatus::Active), Just(DeviceStatus::Inactive)],
    )
        .prop_map(|(id, owner, location, status)| Device {
            id,
            owner,
            location,
            status,
        })
}

fn data_record() -> impl Strategy<Value = DataRecord> {
    (
        device_id(),
        text(),
        text(),
        record_status(),
        proptest::option::of("[a-z0-9-]{1,12}"),
    )
        .prop_map(|(device_id, timestamp, data, status, verifier_id)| DataRecord {
            device_id,
            timestamp,
            data,
            status,
            verifier_id,
        })
}

proptest! {
    #[test]
    fn device_round_trips(device in device()) {
        let bytes = device.to_bytes().unwrap();
        prop_assert_eq!(Device::from_bytes(&device.id, &bytes).unwrap(), device);
    }

    #[test]
    fn data_record_round_trips(record in data_record()) {
        let bytes = record.to_bytes().unwrap();
        prop_assert_eq!(DataRecord::from_bytes("key", &bytes).unwrap(), record);
    }

    #[test]
    fn register_then_get_is_active(id in device_id(), owner in text(), location in text()) {
        let device = block_on(async {
            let ledger = MemoryLedgerHandler::new();
            DeviceRegistry
                .register_device(&ledger, &id, &owner, &location)
                .await
                .unwrap();
            DeviceRegistry.get_device(&ledger, &id).await.unwrap()
        });
        prop_assert_eq!(device, Device {
            id,
            owner,
            location,
            status: DeviceStatus::Active,
        });
    }

    #[test]
    fn second_registration_never_changes_device(
        id in device_id(),
        first in (text(), text()),
        second in (text(), text()),
    ) {
        let (result, stored) = block_on(async {
            let ledger = MemoryLedgerHandler::new();
            DeviceRegistry
                .register_device(&ledger, &id, &first.0, &first.1)
                .await
                .unwrap();
            let result = DeviceRegistry
                .register_device(&ledger, &id, &second.0, &second.1)
                .await;
            (result, DeviceRegistry.get_device(&ledger, &id).await.unwrap())
        });
        let is_already_exists = matches!(result, Err(RegistryError::AlreadyExists { .. }));
        prop_assert!(is_already_exists);
        prop_assert_eq!(stored.owner, first.0);
        prop_assert_eq!(stored.location, first.1);
    }

    #[test]
    fn submit_then_get_is_pending(id in device_id(), timestamp in text(), data in text()) {
        let record = block_on(async {
            let ledger = MemoryLedgerHandler::new();
            DeviceRegistry
                .register_device(&ledger, &id, "owner", "somewhere")
                .await
                .unwrap();
            let store = DataRecordStore::default();
            store.submit_data(&ledger, &id, &timestamp, &data).await.unwrap();
            store.get_data_record(&ledger, &id, &timestamp).await.unwrap()
        });
        prop_assert_eq!(record, DataRecord {
            device_id: id,
            timestamp,
            data,
            status: RecordStatus::Pending,
            verifier_id: None,
        });
    }

    #[test]
    fn verification_follows_outcome(
        id in device_id(),
        timestamp in text(),
        verifier in "[a-z0-9-]{1,12}",
        decisions in proptest::collection::vec(any::<bool>(), 1..4),
    ) {
        let record = block_on(async {
            let ledger = MemoryLedgerHandler::new();
            DeviceRegistry
                .register_device(&ledger, &id, "owner", "somewhere")
                .await
                .unwrap();
            DataRecordStore::default()
                .submit_data(&ledger, &id, &timestamp, "payload")
                .await
                .unwrap();
            for is_valid in &decisions {
                VerificationWorkflow::default()
                    .verify_data(&ledger, &id, &timestamp, &verifier, *is_valid)
                    .await
                    .unwrap();
            }
            DataRecordStore::default()
                .get_data_record(&ledger, &id, &timestamp)
                .await
                .unwrap()
        });
        let last = *decisions.last().unwrap();
        prop_assert_eq!(record.status, RecordStatus::transition(last));
        prop_assert_eq!(record.verifier_id, Some(verifier));
        prop_assert_eq!(record.data, "payload");
    }

    #[test]
    fn unregistered_devices_never_get_records(id in device_id(), timestamp in text()) {
        let (submitted, fetched, empty) = block_on(async {
            let ledger = MemoryLedgerHandler::new();
            let store = DataRecordStore::default();
            let submitted = store.submit_data(&ledger, &id, &timestamp, "x").await;
            let fetched = store.get_data_record(&ledger, &id, &timestamp).await;
            (submitted, fetched, ledger.is_empty().await)
        });
        let not_registered = matches!(submitted, Err(RegistryError::DeviceNotRegistered { .. }));
        let not_found = matches!(fetched, Err(RegistryError::NotFound { .. }));
        prop_assert!(not_registered);
        prop_assert!(not_found);
        prop_assert!(empty);
    }
}
