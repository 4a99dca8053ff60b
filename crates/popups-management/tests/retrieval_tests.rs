use popups_core::CallerIdentity;
use popups_database::test_utils::TestDatabase;
use popups_entities::{popups, PopupContent};
use popups_management::{
    PopupCollection, PopupError, PopupRetrievalService, PopupScheduleService, PopupService,
    PopupVariantService, RetrievalParams, RetrievalStrategy,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde_json::json;

fn content(text: &str) -> PopupContent {
    PopupContent::from_value(json!({ "text": text })).expect("object content")
}

struct Fixture {
    test_db: TestDatabase,
    popups: PopupService,
    variants: PopupVariantService,
    schedules: PopupScheduleService,
    retrieval: PopupRetrievalService,
}

impl Fixture {
    async fn new() -> anyhow::Result<Self> {
        let test_db = TestDatabase::new().await?;
        let db = test_db.connection_arc();
        Ok(Self {
            popups: PopupService::new(db.clone()),
            variants: PopupVariantService::new(db.clone()),
            schedules: PopupScheduleService::new(db.clone()),
            retrieval: PopupRetrievalService::new(db),
            test_db,
        })
    }
}

#[tokio::test]
async fn test_owner_strategy_matches_direct_query() -> anyhow::Result<()> {
    let f = Fixture::new().await?;
    let a = f.popups.create_popup(7, 1, 1, content("a")).await?;
    f.popups.create_popup(8, 1, 1, content("other owner")).await?;
    let b = f.popups.create_popup(7, 2, 3, content("b")).await?;

    let params = RetrievalParams {
        owner_id: Some(7),
        ..Default::default()
    };
    let result = f
        .retrieval
        .select(RetrievalStrategy::Owner, &params, None)
        .await?;

    let expected_ids: Vec<i32> = popups::Entity::find()
        .filter(popups::Column::OwnerId.eq(7))
        .order_by_asc(popups::Column::Id)
        .all(f.test_db.db.as_ref())
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    let PopupCollection::Popups(items) = result else {
        panic!("owner strategy must return popups");
    };
    assert_eq!(
        items.iter().map(|i| i.popup.id).collect::<Vec<_>>(),
        expected_ids
    );
    assert_eq!(expected_ids, vec![a.popup.id, b.popup.id]);

    for item in &items {
        let primary = item.primary_variant.as_ref().expect("primary variant");
        assert!(primary.is_primary);
        assert_eq!(primary.popup_id, item.popup.id);
    }
    Ok(())
}

#[tokio::test]
async fn test_owner_strategy_only_attaches_primary_variant() -> anyhow::Result<()> {
    let f = Fixture::new().await?;
    let created = f.popups.create_popup(7, 1, 1, content("primary")).await?;
    f.variants
        .create_variant(created.popup.id, "B".into(), content("challenger"), false)
        .await?;

    let items = f.retrieval.by_owner(7).await?;
    assert_eq!(items.len(), 1);
    let primary = items[0].primary_variant.as_ref().expect("primary variant");
    assert_eq!(primary.name, "Primary");
    Ok(())
}

#[tokio::test]
async fn test_owner_strategy_requires_owner_id() -> anyhow::Result<()> {
    let f = Fixture::new().await?;
    let err = f
        .retrieval
        .select(RetrievalStrategy::Owner, &RetrievalParams::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PopupError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn test_unknown_owner_returns_empty_collection() -> anyhow::Result<()> {
    let f = Fixture::new().await?;
    f.popups.create_popup(7, 1, 1, content("a")).await?;

    let params = RetrievalParams {
        owner_id: Some(999),
        ..Default::default()
    };
    let result = f
        .retrieval
        .select(RetrievalStrategy::Owner, &params, None)
        .await?;
    assert!(result.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_page_strategy_matches_exact_url_only() -> anyhow::Result<()> {
    let f = Fixture::new().await?;
    let pricing = f.popups.create_popup(7, 1, 1, content("pricing")).await?;
    let home = f.popups.create_popup(7, 1, 1, content("home")).await?;
    let enterprise = f.popups.create_popup(7, 1, 1, content("enterprise")).await?;

    let pricing_variant = pricing.primary_variant.expect("variant").id;
    let home_variant = home.primary_variant.expect("variant").id;
    let enterprise_variant = enterprise.primary_variant.expect("variant").id;

    f.schedules
        .create_schedule(pricing_variant, 0, vec!["/pricing".into(), "/about".into()])
        .await?;
    // A second matching schedule must not duplicate the variant
    f.schedules
        .create_schedule(pricing_variant, 5000, vec!["/pricing".into()])
        .await?;
    f.schedules
        .create_schedule(home_variant, 0, vec!["/home".into()])
        .await?;
    f.schedules
        .create_schedule(enterprise_variant, 0, vec!["/pricing/enterprise".into()])
        .await?;

    let params = RetrievalParams {
        page_url: Some("/pricing".into()),
        ..Default::default()
    };
    let result = f
        .retrieval
        .select(RetrievalStrategy::Page, &params, None)
        .await?;

    let PopupCollection::Variants(variants) = result else {
        panic!("page strategy must return variants");
    };
    assert_eq!(
        variants.iter().map(|v| v.id).collect::<Vec<_>>(),
        vec![pricing_variant]
    );
    Ok(())
}

#[tokio::test]
async fn test_page_strategy_requires_page_url() -> anyhow::Result<()> {
    let f = Fixture::new().await?;
    for page_url in [None, Some("".to_string()), Some("   ".to_string())] {
        let params = RetrievalParams {
            page_url,
            ..Default::default()
        };
        let err = f
            .retrieval
            .select(RetrievalStrategy::Page, &params, None)
            .await
            .unwrap_err();
        assert!(matches!(err, PopupError::Validation(_)));
    }
    Ok(())
}

#[tokio::test]
async fn test_filter_strategy_applies_and_semantics() -> anyhow::Result<()> {
    let f = Fixture::new().await?;
    let both = f.popups.create_popup(7, 2, 3, content("match")).await?;
    f.popups.create_popup(7, 2, 1, content("type only")).await?;
    f.popups.create_popup(7, 1, 3, content("layout only")).await?;
    f.popups.create_popup(8, 2, 3, content("other owner")).await?;

    let params = RetrievalParams {
        type_id: Some(2),
        layout_type_id: Some(3),
        ..Default::default()
    };
    let result = f
        .retrieval
        .select(RetrievalStrategy::Filter, &params, Some(CallerIdentity(7)))
        .await?;

    let PopupCollection::Popups(items) = result else {
        panic!("filter strategy must return popups");
    };
    assert_eq!(
        items.iter().map(|i| i.popup.id).collect::<Vec<_>>(),
        vec![both.popup.id]
    );
    Ok(())
}

#[tokio::test]
async fn test_filter_strategy_without_narrowing_returns_all_caller_popups() -> anyhow::Result<()>
{
    let f = Fixture::new().await?;
    f.popups.create_popup(7, 1, 1, content("a")).await?;
    f.popups.create_popup(7, 2, 2, content("b")).await?;
    f.popups.create_popup(8, 1, 1, content("c")).await?;

    let result = f
        .retrieval
        .select(
            RetrievalStrategy::Filter,
            &RetrievalParams::default(),
            Some(CallerIdentity(7)),
        )
        .await?;
    assert_eq!(result.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_filter_strategy_requires_caller() -> anyhow::Result<()> {
    let f = Fixture::new().await?;
    let err = f
        .retrieval
        .select(RetrievalStrategy::Filter, &RetrievalParams::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PopupError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn test_retrieval_has_no_side_effects() -> anyhow::Result<()> {
    let f = Fixture::new().await?;
    f.popups.create_popup(7, 1, 1, content("a")).await?;
    let before = f.test_db.count_rows("popup_variants").await?;

    let params = RetrievalParams {
        owner_id: Some(7),
        ..Default::default()
    };
    f.retrieval
        .select(RetrievalStrategy::Owner, &params, None)
        .await?;
    f.retrieval
        .select(RetrievalStrategy::Owner, &params, None)
        .await?;

    assert_eq!(f.test_db.count_rows("popup_variants").await?, before);
    assert_eq!(f.test_db.count_rows("popups").await?, 1);
    Ok(())
}
