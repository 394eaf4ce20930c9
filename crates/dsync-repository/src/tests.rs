#![allow(clippy::unwrap_used)]

use sea_orm::{ConnectOptions, Database};

use crate::{
    ApplicationEntry, BundleEntry, BundleMatchCriteria, DestinationRow, RepositoryManager,
};

async fn in_memory() -> RepositoryManager {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1);
    let conn = Database::connect(opt).await.unwrap();
    RepositoryManager::from_connection(conn).await.unwrap()
}

fn row(tenant: &str, name: &str, bundle: &str, revision: &str) -> DestinationRow {
    DestinationRow {
        tenant_id: tenant.to_string(),
        name: name.to_string(),
        bundle_id: bundle.to_string(),
        revision: revision.to_string(),
        destination_type: "HTTP".to_string(),
        url: "https://my54321-api.s4.com".to_string(),
        authentication: "OAuth2ClientCredentials".to_string(),
        x_correlation_id: "sap.s4:communicationScenario:SAP_COM_0108".to_string(),
        x_system_tenant_id: String::new(),
        x_system_tenant_name: "s4".to_string(),
        x_system_type: "SAP S/4HANA Cloud".to_string(),
        x_system_base_url: "https://my54321.s4.com".to_string(),
    }
}

async fn seed_bundles(manager: &RepositoryManager) {
    let bundles = manager.bundle_repository();
    bundles
        .upsert_application(ApplicationEntry {
            id: "app-by-url".to_string(),
            tenant_id: "t1".to_string(),
            name: "s4".to_string(),
            base_url: Some("https://my54321.s4.com".to_string()),
            local_tenant_id: None,
            system_type: Some("SAP S/4HANA Cloud".to_string()),
        })
        .await
        .unwrap();
    bundles
        .upsert_application(ApplicationEntry {
            id: "app-by-local-id".to_string(),
            tenant_id: "t1".to_string(),
            name: "other".to_string(),
            base_url: None,
            local_tenant_id: Some("local-7".to_string()),
            system_type: None,
        })
        .await
        .unwrap();
    for (id, application, correlation) in [
        ("b1", "app-by-url", "sap.s4:communicationScenario:SAP_COM_0108"),
        ("b2", "app-by-url", "sap.s4:communicationScenario:SAP_COM_0999"),
        ("b3", "app-by-local-id", "sap.s4:communicationScenario:SAP_COM_0108"),
    ] {
        bundles
            .upsert_bundle(BundleEntry {
                id: id.to_string(),
                tenant_id: "t1".to_string(),
                application_id: application.to_string(),
                name: format!("bundle {id}"),
                correlation_ids: vec![correlation.to_string(), "unrelated".to_string()],
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn batch_upsert_overwrites_by_primary_key() {
    let manager = in_memory().await;
    let destinations = manager.destination_repository();

    let mut batch = destinations.begin().await.unwrap();
    batch.upsert(row("t1", "d1", "b1", "rev-1")).await.unwrap();
    batch.upsert(row("t1", "d1", "b1", "rev-2")).await.unwrap();
    assert_eq!(batch.commit().await.unwrap(), 2);

    let rows = destinations.list_for_tenant("t1").await.unwrap();
    assert_eq!(rows, vec![row("t1", "d1", "b1", "rev-2")]);
}

#[tokio::test]
async fn dropped_batch_is_rolled_back() {
    let manager = in_memory().await;
    let destinations = manager.destination_repository();

    {
        let mut batch = destinations.begin().await.unwrap();
        batch.upsert(row("t1", "d1", "b1", "rev-1")).await.unwrap();
    }

    assert!(destinations.list_for_tenant("t1").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_stale_keeps_current_revision_and_other_tenants() {
    let manager = in_memory().await;
    let destinations = manager.destination_repository();

    let mut batch = destinations.begin().await.unwrap();
    batch.upsert(row("t1", "old", "b1", "rev-1")).await.unwrap();
    batch.upsert(row("t1", "new", "b1", "rev-2")).await.unwrap();
    batch.upsert(row("t2", "other", "b9", "rev-1")).await.unwrap();
    batch.commit().await.unwrap();

    let deleted = destinations.delete_stale("t1", "rev-2").await.unwrap();

    assert_eq!(deleted, 1);
    let names: Vec<_> = destinations
        .list_for_tenant("t1")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["new"]);
    assert_eq!(destinations.list_for_tenant("t2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn bundles_match_by_base_url_and_name() {
    let manager = in_memory().await;
    seed_bundles(&manager).await;

    let ids = manager
        .bundle_repository()
        .find_matching_bundle_ids(
            "t1",
            BundleMatchCriteria {
                x_correlation_id: "sap.s4:communicationScenario:SAP_COM_0108",
                x_system_tenant_id: "",
                x_system_tenant_name: "s4",
                x_system_base_url: "https://my54321.s4.com",
            },
        )
        .await
        .unwrap();

    assert_eq!(ids, vec!["b1"]);
}

#[tokio::test]
async fn bundles_match_by_local_tenant_id_first() {
    let manager = in_memory().await;
    seed_bundles(&manager).await;

    let ids = manager
        .bundle_repository()
        .find_matching_bundle_ids(
            "t1",
            BundleMatchCriteria {
                x_correlation_id: "sap.s4:communicationScenario:SAP_COM_0108",
                x_system_tenant_id: "local-7",
                x_system_tenant_name: "s4",
                x_system_base_url: "https://my54321.s4.com",
            },
        )
        .await
        .unwrap();

    assert_eq!(ids, vec!["b3"]);
}

#[tokio::test]
async fn no_bundle_matches_other_tenant_or_unknown_correlation() {
    let manager = in_memory().await;
    seed_bundles(&manager).await;
    let bundles = manager.bundle_repository();

    let other_tenant = bundles
        .find_matching_bundle_ids(
            "t2",
            BundleMatchCriteria {
                x_correlation_id: "sap.s4:communicationScenario:SAP_COM_0108",
                x_system_tenant_id: "",
                x_system_tenant_name: "s4",
                x_system_base_url: "https://my54321.s4.com",
            },
        )
        .await
        .unwrap();
    let unknown = bundles
        .find_matching_bundle_ids(
            "t1",
            BundleMatchCriteria {
                x_correlation_id: "sap.s4:communicationScenario:SAP_COM_4242",
                x_system_tenant_id: "",
                x_system_tenant_name: "s4",
                x_system_base_url: "https://my54321.s4.com",
            },
        )
        .await
        .unwrap();

    assert!(other_tenant.is_empty());
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn batch_lookup_sees_committed_bundles() {
    let manager = in_memory().await;
    seed_bundles(&manager).await;

    let batch = manager.destination_repository().begin().await.unwrap();
    let ids = batch
        .matching_bundle_ids(
            "t1",
            BundleMatchCriteria {
                x_correlation_id: "sap.s4:communicationScenario:SAP_COM_0999",
                x_system_tenant_id: "",
                x_system_tenant_name: "s4",
                x_system_base_url: "https://my54321.s4.com",
            },
        )
        .await
        .unwrap();
    batch.commit().await.unwrap();

    assert_eq!(ids, vec!["b2"]);
}

#[tokio::test]
async fn tenant_labels_identify_subscribed_tenants() {
    let manager = in_memory().await;
    let labels = manager.tenant_label_repository();

    labels.set_label("t2", "subdomain", "beta").await.unwrap();
    labels.set_label("t1", "subdomain", "alpha").await.unwrap();
    labels.set_label("t1", "region", "eu10").await.unwrap();
    labels.set_label("t3", "region", "us10").await.unwrap();
    labels.set_label("t1", "subdomain", "alpha-2").await.unwrap();

    assert_eq!(
        labels.tenants_with_label("subdomain").await.unwrap(),
        vec!["t1", "t2"]
    );
    assert_eq!(
        labels.get_label("t1", "subdomain").await.unwrap().as_deref(),
        Some("alpha-2")
    );
    assert_eq!(labels.get_label("t2", "region").await.unwrap(), None);

    assert_eq!(labels.remove_label("t2", "subdomain").await.unwrap(), 1);
    assert_eq!(
        labels.tenants_with_label("subdomain").await.unwrap(),
        vec!["t1"]
    );
}

#[tokio::test]
async fn leader_lease_is_exclusive_until_expiry() {
    let manager = in_memory().await;
    let leases = manager.leader_lease_repository();

    assert!(leases.try_acquire("sync", "a", 1_000, 11_000).await.unwrap());
    // renewal by the holder
    assert!(leases.try_acquire("sync", "a", 2_000, 12_000).await.unwrap());
    // live lease held by someone else
    assert!(!leases.try_acquire("sync", "b", 3_000, 13_000).await.unwrap());
    // expired lease is taken over
    assert!(leases.try_acquire("sync", "b", 12_001, 22_001).await.unwrap());
    assert_eq!(
        leases.current_holder("sync").await.unwrap(),
        Some(("b".to_string(), 22_001))
    );

    assert!(!leases.release("sync", "a").await.unwrap());
    assert!(leases.release("sync", "b").await.unwrap());
    assert_eq!(leases.current_holder("sync").await.unwrap(), None);
}
