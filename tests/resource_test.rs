use api_resource::framework::mock::MockTransport;
use api_resource::framework::{
    HasMany, Method, Namespace, RelationshipDef, ResourceError, ResourceSchema, Response,
    TransportError,
};
use api_resource::model::{self, Manufacturer, Part, Widget};
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn setup() -> (Arc<MockTransport>, Namespace) {
    let mock = Arc::new(MockTransport::new());
    let namespace = model::schemas()
        .into_iter()
        .fold(Namespace::builder(mock.clone()), |builder, schema| {
            builder.register(schema)
        })
        .build()
        .expect("Sample model should resolve");
    (mock, namespace)
}

fn widget_record() -> Value {
    json!({
        "id": 5,
        "attributes": {"name": "Sprocket", "price": 10, "serial_number": "S-5"}
    })
}

fn part_records() -> Value {
    json!([
        {"id": 11, "attributes": {"name": "Bolt", "quantity": 4}},
        {"id": "12", "attributes": {"name": "Nut", "quantity": 4}}
    ])
}

async fn find_widget(mock: &MockTransport, namespace: &Namespace) -> Widget {
    mock.expect_get("/widgets/5").return_data(widget_record());
    Widget::find(namespace, 5).await.expect("Failed to find widget")
}

#[tokio::test]
async fn test_create_posts_full_envelope_and_returns_clean_entity() {
    let (mock, namespace) = setup();
    mock.expect_post("/widgets")
        .with_body(json!({"data": {"type": "widgets", "attributes": {"name": "Widget"}}}))
        .return_data(json!({"id": 5, "attributes": {"name": "Widget"}}));

    let widget = Widget::create(&namespace, [("name", "Widget")]).await.unwrap();

    assert_eq!(widget.id(), 5);
    assert_eq!(widget.name(), Some(&json!("Widget")));
    assert!(!widget.is_modified());
    mock.verify();
}

#[tokio::test]
async fn test_create_failure_propagates_transport_error() {
    let (mock, namespace) = setup();
    let error = TransportError::Status {
        status: 422,
        body: "name can't be blank".into(),
    };
    mock.expect_post("/widgets").return_err(error.clone());

    let err = Widget::create(&namespace, [("name", "")]).await.unwrap_err();
    assert_eq!(err, ResourceError::Transport(error));
}

#[tokio::test]
async fn test_create_transforms_keys_with_schema_case() {
    let (mock, namespace) = setup();
    mock.expect_post("/manufacturers")
        .with_body(json!({
            "data": {
                "type": "manufacturers",
                "attributes": {"name": "Acme", "founded-year": 1947}
            }
        }))
        .return_data(json!({"id": 3, "attributes": {"name": "Acme", "founded-year": 1947}}));

    let acme = Manufacturer::create(
        &namespace,
        [("name", json!("Acme")), ("founded_year", json!(1947))],
    )
    .await
    .unwrap();

    assert_eq!(acme.founded_year(), Some(&json!(1947)));
    assert!(acme.attributes().contains_key("founded-year"));
    mock.verify();
}

#[tokio::test]
async fn test_find_surfaces_not_found_unchanged() {
    let (mock, namespace) = setup();
    mock.expect_get("/widgets/99").return_err(TransportError::Status {
        status: 404,
        body: "not found".into(),
    });

    let err = Widget::find(&namespace, 99).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(
        err,
        ResourceError::Transport(TransportError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_find_rejects_non_integer_id() {
    let (mock, namespace) = setup();
    mock.expect_get("/widgets/5")
        .return_data(json!({"id": "five", "attributes": {}}));

    let err = Widget::find(&namespace, 5).await.unwrap_err();
    assert!(matches!(err, ResourceError::InvalidId(_)));
}

#[tokio::test]
async fn test_filter_sends_keys_verbatim_and_keeps_server_order() {
    let (mock, namespace) = setup();
    mock.expect_get("/parts")
        .with_params(json!({"filter": {"widgetId": 5}}))
        .return_data(part_records());

    let parts = Part::filter(&namespace, [("widgetId", 5)]).await.unwrap();

    let ids: Vec<i64> = parts.iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec![11, 12]);
    mock.verify();
}

#[tokio::test]
async fn test_all_sends_no_filter_param() {
    let (mock, namespace) = setup();
    mock.expect_get("/widgets")
        .with_params(json!({}))
        .return_data(json!([widget_record()]));

    let widgets = Widget::all(&namespace).await.unwrap();
    assert_eq!(widgets.len(), 1);
    assert_eq!(mock.requests()[0].options.params, Map::new());
}

#[tokio::test]
async fn test_setters_track_touched_keys_until_save() {
    let (mock, namespace) = setup();
    let mut widget = find_widget(&mock, &namespace).await;
    assert!(!widget.is_modified());

    widget.set_name("Cog");
    widget.set_name("Gear");
    widget.set_price(10); // same value, still dirty
    let keys: Vec<&str> = widget.modified_keys().iter().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "price"]);

    mock.expect_patch("/widgets/5")
        .with_body(json!({
            "data": {"id": 5, "type": "widgets", "attributes": {"name": "Gear", "price": 10}}
        }))
        .return_data(json!({"id": 5, "attributes": {"name": "Gear", "price": 10, "serial_number": "S-5"}}));
    widget.save().await.unwrap();

    assert!(widget.modified_keys().is_empty());
    assert!(!widget.is_modified());
    mock.verify();
}

#[tokio::test]
async fn test_update_envelope_is_partial() {
    let (mock, namespace) = setup();
    let mut widget = find_widget(&mock, &namespace).await;

    widget.set_price(9);

    assert_eq!(
        widget.update_envelope(),
        json!({"data": {"id": 5, "type": "widgets", "attributes": {"price": 9}}})
    );
}

#[tokio::test]
async fn test_save_on_clean_entity_makes_no_request() {
    let (mock, namespace) = setup();
    let mut widget = find_widget(&mock, &namespace).await;
    let before = widget.to_hash();

    widget.save().await.unwrap();

    assert_eq!(mock.request_count(), 1);
    assert_eq!(widget.to_hash(), before);
}

#[tokio::test]
async fn test_save_replaces_state_with_server_response() {
    let (mock, namespace) = setup();
    let mut widget = find_widget(&mock, &namespace).await;
    widget.set_name("Cog");

    mock.expect_patch("/widgets/5").return_response(Response {
        data: json!({
            "id": 5,
            "attributes": {"name": "Cog (v2)"},
            "meta": {"version": 2}
        }),
        ..Response::default()
    });
    widget.save().await.unwrap();

    assert_eq!(widget.name(), Some(&json!("Cog (v2)")));
    assert_eq!(widget.price(), None);
    assert_eq!(widget.meta().get("version"), Some(&json!(2)));
}

#[tokio::test]
async fn test_failed_save_leaves_entity_dirty() {
    let (mock, namespace) = setup();
    let mut widget = find_widget(&mock, &namespace).await;
    widget.set_name("Cog");

    mock.expect_patch("/widgets/5")
        .return_err(TransportError::Network("connection reset".into()));
    let err = widget.save().await.unwrap_err();

    assert_eq!(err, ResourceError::Transport(TransportError::Network("connection reset".into())));
    assert!(widget.is_modified());
    assert_eq!(widget.name(), Some(&json!("Cog")));
}

#[tokio::test]
async fn test_has_many_is_resolved_once_and_memoized() {
    let (mock, namespace) = setup();
    let mut widget = find_widget(&mock, &namespace).await;
    mock.expect_get("/parts")
        .with_params(json!({"filter": {"widget_id": 5}}))
        .return_data(part_records());

    let first: *const HasMany = widget.parts().await.unwrap();
    let second: *const HasMany = widget.parts().await.unwrap();

    assert!(std::ptr::eq(first, second));
    assert_eq!(mock.request_count(), 2);
    let parts = widget.parts().await.unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts.foreign_key(), "widget_id");
    assert_eq!(parts.target().type_name(), "Part");
    mock.verify();
}

#[tokio::test]
async fn test_unresolved_relationships_do_not_make_entity_dirty() {
    let (mock, namespace) = setup();
    let widget = find_widget(&mock, &namespace).await;
    assert!(widget.associations().is_empty());
    assert!(!widget.is_modified());
}

#[tokio::test]
async fn test_modified_child_marks_owner_modified_and_saves_first() {
    let (mock, namespace) = setup();
    let mut widget = find_widget(&mock, &namespace).await;
    mock.expect_get("/parts").return_data(part_records());

    let parts = widget.parts().await.unwrap();
    parts.get_mut(1).unwrap().set("quantity", 8);
    assert!(widget.is_modified());
    assert!(widget.modified_keys().is_empty());

    mock.expect_patch("/parts/12")
        .with_body(json!({"data": {"id": 12, "type": "parts", "attributes": {"quantity": 8}}}))
        .return_data(json!({"id": 12, "attributes": {"name": "Nut", "quantity": 8}}));
    widget.save().await.unwrap();

    // The owner itself was clean, so only the child was written.
    assert_eq!(mock.request_count(), 3);
    assert!(!widget.is_modified());
    mock.verify();
}

#[tokio::test]
async fn test_save_walks_associations_in_access_order_then_owner() {
    let (mock, namespace) = setup();
    mock.expect_get("/manufacturers/3")
        .return_data(json!({"id": 3, "attributes": {"name": "Acme"}}));
    let mut acme = Manufacturer::find(&namespace, 3).await.unwrap();

    mock.expect_get("/widgets")
        .with_params(json!({"filter": {"manufacturer_id": 3}}))
        .return_data(json!([widget_record()]));
    let widgets = acme.widgets().await.unwrap();
    let widget = widgets.get_mut(0).unwrap();

    mock.expect_get("/parts").return_data(part_records());
    let parts = widget.has_many("parts").await.unwrap();
    parts.get_mut(0).unwrap().set("quantity", 5);
    widget.set("name", "Cog");
    acme.set_country("NL");

    mock.expect_patch("/parts/11")
        .return_data(json!({"id": 11, "attributes": {"quantity": 5}}));
    mock.expect_patch("/widgets/5")
        .return_data(json!({"id": 5, "attributes": {"name": "Cog"}}));
    mock.expect_patch("/manufacturers/3")
        .with_body(json!({"data": {"id": 3, "type": "manufacturers", "attributes": {"country": "NL"}}}))
        .return_data(json!({"id": 3, "attributes": {"name": "Acme", "country": "NL"}}));
    acme.save().await.unwrap();

    let writes: Vec<String> = mock
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::Patch)
        .map(|r| r.path)
        .collect();
    assert_eq!(writes, vec!["/parts/11", "/widgets/5", "/manufacturers/3"]);
    assert!(!acme.is_modified());
    mock.verify();
}

#[tokio::test]
async fn test_sibling_associations_save_in_first_access_order() {
    let mock = Arc::new(MockTransport::new());
    let namespace = Namespace::builder(mock.clone())
        .register(Widget::schema())
        .register(Part::schema())
        .register(
            ResourceSchema::builder("Manufacturer")
                .attribute("name")
                .has_many("widgets")
                .relationship(RelationshipDef::has_many("parts").foreign_key("maker_id"))
                .build(),
        )
        .build()
        .unwrap();
    mock.expect_get("/manufacturers/3")
        .return_data(json!({"id": 3, "attributes": {"name": "Acme"}}));
    let mut acme = namespace.class("Manufacturer").unwrap().find(3).await.unwrap();

    // Declared widgets-then-parts, accessed parts-then-widgets.
    mock.expect_get("/parts")
        .with_params(json!({"filter": {"maker_id": 3}}))
        .return_data(part_records());
    acme.has_many("parts").await.unwrap().get_mut(1).unwrap().set("quantity", 1);
    mock.expect_get("/widgets")
        .with_params(json!({"filter": {"manufacturer_id": 3}}))
        .return_data(json!([widget_record()]));
    acme.has_many("widgets").await.unwrap().get_mut(0).unwrap().set("name", "Cog");
    acme.set("name", "Acme Corp");

    let names: Vec<&str> = acme.associations().iter().map(HasMany::name).collect();
    assert_eq!(names, vec!["parts", "widgets"]);

    mock.expect_patch("/parts/12")
        .return_data(json!({"id": 12, "attributes": {"quantity": 1}}));
    mock.expect_patch("/widgets/5")
        .return_data(json!({"id": 5, "attributes": {"name": "Cog"}}));
    mock.expect_patch("/manufacturers/3")
        .return_data(json!({"id": 3, "attributes": {"name": "Acme Corp"}}));
    acme.save().await.unwrap();

    let writes: Vec<String> = mock
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::Patch)
        .map(|r| r.path)
        .collect();
    assert_eq!(writes, vec!["/parts/12", "/widgets/5", "/manufacturers/3"]);
    assert!(!acme.is_modified());
    mock.verify();
}

#[tokio::test]
async fn test_failing_child_stops_the_walk() {
    let (mock, namespace) = setup();
    let mut widget = find_widget(&mock, &namespace).await;
    mock.expect_get("/parts").return_data(part_records());

    let parts = widget.parts().await.unwrap();
    for part in parts.iter_mut() {
        part.set("quantity", 0);
    }
    widget.set_name("Cog");

    mock.expect_patch("/parts/11").return_err(TransportError::Status {
        status: 422,
        body: "quantity must be positive".into(),
    });
    let err = widget.save().await.unwrap_err();

    assert!(matches!(
        err,
        ResourceError::Transport(TransportError::Status { status: 422, .. })
    ));
    assert_eq!(mock.request_count(), 3);
    assert!(widget.is_modified());
    assert!(widget.modified_keys().contains("name"));
    mock.verify();
}

#[tokio::test]
async fn test_memo_is_not_refreshed_after_save() {
    let (mock, namespace) = setup();
    let mut widget = find_widget(&mock, &namespace).await;
    mock.expect_get("/parts").return_data(part_records());
    assert_eq!(widget.parts().await.unwrap().len(), 2);

    widget.set_name("Cog");
    mock.expect_patch("/widgets/5")
        .return_data(json!({"id": 5, "attributes": {"name": "Cog"}}));
    widget.save().await.unwrap();

    // Still the pre-save collection, no new query.
    assert_eq!(widget.parts().await.unwrap().len(), 2);
    assert_eq!(mock.request_count(), 3);
    mock.verify();
}

#[tokio::test]
async fn test_belongs_to_fetches_nested_path_once() {
    let (mock, namespace) = setup();
    mock.expect_get("/parts/11")
        .return_data(json!({"id": 11, "attributes": {"name": "Bolt"}}));
    let mut part = Part::find(&namespace, 11).await.unwrap();

    mock.expect_get("/parts/11/widget").return_data(widget_record());
    let widget = part.widget().await.unwrap();
    assert_eq!(widget.id(), 5);
    assert_eq!(widget.resource_type(), "widgets");

    part.widget().await.unwrap();
    assert_eq!(mock.request_count(), 2);
    mock.verify();
}

#[tokio::test]
async fn test_belongs_to_target_is_not_saved_with_owner() {
    let (mock, namespace) = setup();
    mock.expect_get("/parts/11")
        .return_data(json!({"id": 11, "attributes": {"name": "Bolt"}}));
    let mut part = Part::find(&namespace, 11).await.unwrap();
    mock.expect_get("/parts/11/widget").return_data(widget_record());

    part.widget().await.unwrap().set("name", "Cog");
    assert!(!part.is_modified());
    part.save().await.unwrap();

    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn test_unknown_relationship_is_rejected_without_request() {
    let (mock, namespace) = setup();
    let mut widget = find_widget(&mock, &namespace).await;

    let err = widget.has_many("gears").await.unwrap_err();
    assert_eq!(
        err,
        ResourceError::UnknownRelationship {
            resource_type: "widgets".into(),
            name: "gears".into(),
        }
    );
    // Declared, but as belongs-to.
    assert!(widget.has_many("manufacturer").await.is_err());
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_namespace_rejects_unresolved_target() {
    let mock = Arc::new(MockTransport::new());
    let err = Namespace::builder(mock)
        .register(Widget::schema())
        .register(Part::schema())
        .build()
        .unwrap_err();
    assert!(matches!(err, ResourceError::UnresolvedType(msg) if msg.starts_with("Manufacturer")));

    let (_, namespace) = setup();
    assert_eq!(
        namespace.class("Gadget").unwrap_err(),
        ResourceError::UnresolvedType("Gadget".into())
    );
}

#[tokio::test]
async fn test_to_hash_round_trips_response() {
    let (mock, namespace) = setup();
    mock.expect_get("/widgets/5").return_data(json!({
        "id": "5",
        "attributes": {"name": "Sprocket"},
        "links": {"self": "/widgets/5"}
    }));
    let widget = Widget::find(&namespace, 5).await.unwrap();

    assert_eq!(
        serde_json::to_value(widget.to_hash()).unwrap(),
        json!({
            "id": 5,
            "type": "widgets",
            "attributes": {"name": "Sprocket"},
            "links": {"self": "/widgets/5"}
        })
    );
}

#[tokio::test]
async fn test_explicit_schema_without_macro() {
    let mock = Arc::new(MockTransport::new());
    let namespace = Namespace::builder(mock.clone())
        .register(ResourceSchema::builder("LineItem").attribute("unit_price").build())
        .build()
        .unwrap();
    mock.expect_get("/line_items/1")
        .return_data(json!({"id": 1, "attributes": {"unit_price": 3}}));

    let item = namespace.class("LineItem").unwrap().find(1).await.unwrap();
    assert_eq!(item.get("unit_price"), Some(&json!(3)));
    assert_eq!(item.path(), "/line_items/1");
}
