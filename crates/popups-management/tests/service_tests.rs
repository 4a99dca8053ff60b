use popups_database::test_utils::TestDatabase;
use popups_entities::{popup_variants, PopupContent};
use popups_management::{
    PopupError, PopupLayoutTypeService, PopupScheduleService, PopupService, PopupTypeService,
    PopupVariantService, PRIMARY_VARIANT_NAME,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

fn content(value: serde_json::Value) -> PopupContent {
    PopupContent::from_value(value).expect("object content")
}

async fn primary_count(test_db: &TestDatabase, popup_id: i32) -> anyhow::Result<u64> {
    Ok(popup_variants::Entity::find()
        .filter(popup_variants::Column::PopupId.eq(popup_id))
        .filter(popup_variants::Column::IsPrimary.eq(true))
        .count(test_db.db.as_ref())
        .await?)
}

#[tokio::test]
async fn test_create_popup_creates_primary_variant() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let service = PopupService::new(test_db.connection_arc());

    let created = service
        .create_popup(7, 1, 1, content(json!({"text": "Hi"})))
        .await?;

    assert_eq!(created.popup.owner_id, 7);
    let primary = created.primary_variant.expect("primary variant");
    assert_eq!(primary.name, PRIMARY_VARIANT_NAME);
    assert!(primary.is_primary);
    assert_eq!(primary.content.get("text"), Some(&json!("Hi")));

    let fetched = service.get_popup(created.popup.id).await?;
    assert_eq!(fetched.primary_variant.map(|v| v.id), Some(primary.id));
    Ok(())
}

#[tokio::test]
async fn test_create_popup_with_unknown_type_rolls_back() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let service = PopupService::new(test_db.connection_arc());

    let err = service
        .create_popup(7, 99, 1, content(json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, PopupError::Validation(_)));

    let err = service
        .create_popup(7, 1, 99, content(json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, PopupError::Validation(_)));

    assert_eq!(test_db.count_rows("popups").await?, 0);
    assert_eq!(test_db.count_rows("popup_variants").await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_update_popup_changes_taxonomy() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let service = PopupService::new(test_db.connection_arc());
    let created = service.create_popup(7, 1, 1, content(json!({}))).await?;

    let updated = service
        .update_popup(created.popup.id, Some(2), None)
        .await?;
    assert_eq!(updated.popup.type_id, 2);
    assert_eq!(updated.popup.layout_type_id, 1);
    assert!(updated.primary_variant.is_some());

    let err = service
        .update_popup(created.popup.id, None, Some(42))
        .await
        .unwrap_err();
    assert!(matches!(err, PopupError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn test_missing_popup_is_not_found() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let service = PopupService::new(test_db.connection_arc());

    assert!(matches!(
        service.get_popup(404).await.unwrap_err(),
        PopupError::NotFound { .. }
    ));
    assert!(matches!(
        service.update_popup(404, Some(1), None).await.unwrap_err(),
        PopupError::NotFound { .. }
    ));
    assert!(matches!(
        service.delete_popup(404).await.unwrap_err(),
        PopupError::NotFound { .. }
    ));
    Ok(())
}

#[tokio::test]
async fn test_delete_popup_cascades() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let db = test_db.connection_arc();
    let popups = PopupService::new(db.clone());
    let schedules = PopupScheduleService::new(db);

    let created = popups.create_popup(7, 1, 1, content(json!({}))).await?;
    let variant_id = created.primary_variant.expect("variant").id;
    schedules
        .create_schedule(variant_id, 100, vec!["/home".into()])
        .await?;

    popups.delete_popup(created.popup.id).await?;

    assert_eq!(test_db.count_rows("popups").await?, 0);
    assert_eq!(test_db.count_rows("popup_variants").await?, 0);
    assert_eq!(test_db.count_rows("popup_schedules").await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_list_owner_popups() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let service = PopupService::new(test_db.connection_arc());
    service.create_popup(7, 1, 1, content(json!({}))).await?;
    service.create_popup(7, 2, 2, content(json!({}))).await?;
    service.create_popup(9, 1, 1, content(json!({}))).await?;

    assert_eq!(service.list_owner_popups(7).await?.len(), 2);
    assert_eq!(service.list_owner_popups(9).await?.len(), 1);
    assert!(service.list_owner_popups(1).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_new_variant_is_not_primary_by_default() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let db = test_db.connection_arc();
    let popups = PopupService::new(db.clone());
    let variants = PopupVariantService::new(db);

    let created = popups.create_popup(7, 1, 1, content(json!({}))).await?;
    let challenger = variants
        .create_variant(created.popup.id, "B".into(), content(json!({"text": "B"})), false)
        .await?;

    assert!(!challenger.is_primary);
    assert_eq!(primary_count(&test_db, created.popup.id).await?, 1);
    assert_eq!(variants.list_variants(created.popup.id).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_promoting_variant_demotes_siblings() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let db = test_db.connection_arc();
    let popups = PopupService::new(db.clone());
    let variants = PopupVariantService::new(db);

    let created = popups.create_popup(7, 1, 1, content(json!({}))).await?;
    let original = created.primary_variant.expect("variant");

    // Created as primary
    let b = variants
        .create_variant(created.popup.id, "B".into(), content(json!({})), true)
        .await?;
    assert!(b.is_primary);
    assert_eq!(primary_count(&test_db, created.popup.id).await?, 1);
    assert!(!variants.get_variant(original.id).await?.is_primary);

    // Promoted by update
    let c = variants
        .create_variant(created.popup.id, "C".into(), content(json!({})), false)
        .await?;
    let c = variants.update_variant(c.id, None, None, Some(true)).await?;
    assert!(c.is_primary);
    assert_eq!(primary_count(&test_db, created.popup.id).await?, 1);

    let fetched = popups.get_popup(created.popup.id).await?;
    assert_eq!(fetched.primary_variant.map(|v| v.id), Some(c.id));
    Ok(())
}

#[tokio::test]
async fn test_promotion_is_scoped_to_one_popup() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let db = test_db.connection_arc();
    let popups = PopupService::new(db.clone());
    let variants = PopupVariantService::new(db);

    let first = popups.create_popup(7, 1, 1, content(json!({}))).await?;
    let second = popups.create_popup(7, 1, 1, content(json!({}))).await?;

    variants
        .create_variant(first.popup.id, "B".into(), content(json!({})), true)
        .await?;

    assert_eq!(primary_count(&test_db, second.popup.id).await?, 1);
    let untouched = second.primary_variant.expect("variant");
    assert!(variants.get_variant(untouched.id).await?.is_primary);
    Ok(())
}

#[tokio::test]
async fn test_store_rejects_second_primary_written_directly() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let db = test_db.connection_arc();
    let popups = PopupService::new(db.clone());
    let variants = PopupVariantService::new(db);

    let created = popups.create_popup(7, 1, 1, content(json!({}))).await?;
    let b = variants
        .create_variant(created.popup.id, "B".into(), content(json!({})), false)
        .await?;

    // Skips the sibling demotion, as a concurrent promotion would
    let bypass = test_db
        .execute_sql(&format!(
            "UPDATE popup_variants SET is_primary = 1 WHERE id = {}",
            b.id
        ))
        .await;
    assert!(bypass.is_err());
    assert_eq!(primary_count(&test_db, created.popup.id).await?, 1);
    Ok(())
}

/// Races promotions of every sibling; needs Docker
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_concurrent_promotions_leave_one_primary_on_postgres() -> anyhow::Result<()> {
    let test_db = TestDatabase::postgres().await?;
    let db = test_db.connection_arc();
    let popups = PopupService::new(db.clone());
    let variants = PopupVariantService::new(db);

    let created = popups.create_popup(7, 1, 1, content(json!({}))).await?;
    let mut siblings = Vec::new();
    for name in ["B", "C", "D", "E", "F", "G"] {
        let variant = variants
            .create_variant(created.popup.id, name.into(), content(json!({})), false)
            .await?;
        siblings.push(variant.id);
    }

    let handles: Vec<_> = siblings
        .into_iter()
        .map(|id| {
            let variants = variants.clone();
            tokio::spawn(async move { variants.update_variant(id, None, None, Some(true)).await })
        })
        .collect();

    for handle in handles {
        match handle.await? {
            Ok(variant) => assert!(variant.is_primary),
            Err(err) => assert!(matches!(err, PopupError::Conflict(_)), "{err}"),
        }
    }

    assert_eq!(primary_count(&test_db, created.popup.id).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_deleting_primary_variant_leaves_no_primary() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let db = test_db.connection_arc();
    let popups = PopupService::new(db.clone());
    let variants = PopupVariantService::new(db);

    let created = popups.create_popup(7, 1, 1, content(json!({}))).await?;
    variants
        .create_variant(created.popup.id, "B".into(), content(json!({})), false)
        .await?;
    variants
        .delete_variant(created.primary_variant.expect("variant").id)
        .await?;

    assert_eq!(primary_count(&test_db, created.popup.id).await?, 0);
    assert!(popups.get_popup(created.popup.id).await?.primary_variant.is_none());
    Ok(())
}

#[tokio::test]
async fn test_variant_validation() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let db = test_db.connection_arc();
    let popups = PopupService::new(db.clone());
    let variants = PopupVariantService::new(db);
    let created = popups.create_popup(7, 1, 1, content(json!({}))).await?;

    let err = variants
        .create_variant(created.popup.id, "  ".into(), content(json!({})), false)
        .await
        .unwrap_err();
    assert!(matches!(err, PopupError::Validation(_)));

    let err = variants
        .create_variant(999, "B".into(), content(json!({})), false)
        .await
        .unwrap_err();
    assert!(matches!(err, PopupError::Validation(_)));

    let err = variants.list_variants(999).await.unwrap_err();
    assert!(matches!(err, PopupError::NotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn test_schedule_lifecycle() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let db = test_db.connection_arc();
    let popups = PopupService::new(db.clone());
    let schedules = PopupScheduleService::new(db);

    let variant_id = popups
        .create_popup(7, 1, 1, content(json!({})))
        .await?
        .primary_variant
        .expect("variant")
        .id;

    let schedule = schedules
        .create_schedule(variant_id, 3000, vec![" /home ".into(), "/home".into(), "/pricing".into()])
        .await?;
    assert_eq!(schedule.time_delay, 3000);
    assert_eq!(
        schedule.display_pages.iter().collect::<Vec<_>>(),
        vec!["/home", "/pricing"]
    );

    let updated = schedules
        .update_schedule(schedule.id, Some(0), Some(vec!["/about".into()]))
        .await?;
    assert_eq!(updated.time_delay, 0);
    assert!(updated.display_pages.contains("/about"));
    assert!(!updated.display_pages.contains("/home"));

    assert_eq!(schedules.list_schedules(variant_id).await?.len(), 1);
    schedules.delete_schedule(schedule.id).await?;
    assert!(schedules.list_schedules(variant_id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_schedule_validation() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let db = test_db.connection_arc();
    let popups = PopupService::new(db.clone());
    let schedules = PopupScheduleService::new(db);
    let variant_id = popups
        .create_popup(7, 1, 1, content(json!({})))
        .await?
        .primary_variant
        .expect("variant")
        .id;

    let err = schedules
        .create_schedule(variant_id, -1, vec!["/home".into()])
        .await
        .unwrap_err();
    assert!(matches!(err, PopupError::Validation(_)));

    let err = schedules
        .create_schedule(variant_id, 0, vec!["".into()])
        .await
        .unwrap_err();
    assert!(matches!(err, PopupError::Validation(_)));

    let err = schedules
        .create_schedule(12345, 0, vec!["/home".into()])
        .await
        .unwrap_err();
    assert!(matches!(err, PopupError::Validation(_)));

    let err = schedules.delete_schedule(12345).await.unwrap_err();
    assert!(matches!(err, PopupError::NotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn test_popup_type_crud() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let service = PopupTypeService::new(test_db.connection_arc());

    let seeded = service.list_types().await?;
    assert_eq!(
        seeded.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["Promotional Offer", "Newsletter Signup", "Social Media Link"]
    );

    let created = service.create_type(" Exit Survey ".into()).await?;
    assert_eq!(created.name, "Exit Survey");

    let renamed = service.update_type(created.id, "Feedback".into()).await?;
    assert_eq!(renamed.name, "Feedback");
    assert_eq!(service.get_type(created.id).await?.name, "Feedback");

    service.delete_type(created.id).await?;
    assert!(matches!(
        service.get_type(created.id).await.unwrap_err(),
        PopupError::NotFound { .. }
    ));

    assert!(matches!(
        service.create_type("".into()).await.unwrap_err(),
        PopupError::Validation(_)
    ));
    Ok(())
}

#[tokio::test]
async fn test_deleting_layout_type_removes_its_popups() -> anyhow::Result<()> {
    let test_db = TestDatabase::new().await?;
    let db = test_db.connection_arc();
    let layouts = PopupLayoutTypeService::new(db.clone());
    let popups = PopupService::new(db);

    let layout = layouts.create_layout_type("Bottom Bar".into()).await?;
    popups
        .create_popup(7, 1, layout.id, content(json!({})))
        .await?;
    popups.create_popup(7, 1, 1, content(json!({}))).await?;

    layouts.delete_layout_type(layout.id).await?;

    assert_eq!(test_db.count_rows("popups").await?, 1);
    assert_eq!(layouts.list_layout_types().await?.len(), 3);
    Ok(())
}
