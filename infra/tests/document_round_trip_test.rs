use human_task_base::{codec_config::CodecConfig, error::HumanTaskError};
use human_task_infra::builder::{structure, HumanTaskDefinitionBuilder};
use human_task_infra::codec::{
    decode_document, encode_document, DocumentFormat, FormatAdapter, HumanTaskCodec, JsonAdapter,
    NodeCodec, YamlAdapter,
};
use human_task_infra::definition::{
    CompletionBehaviorType, DeadlineType, GenericHumanRole, HumanTaskDefinition,
    HumanTaskRoutingMode, IsoDuration, SubtaskExecutionMode, Value, ViewRenderingMode,
};
use itertools::Itertools;
use serde_json::json;

fn full_document() -> serde_json::Value {
    json!({
        "id": "fake-namespace.fake-task:0.1.0",
        "name": "fake-task",
        "namespace": "fake-namespace",
        "version": "0.1.0",
        "specVersion": "0.1.0",
        "routingMode": "parallel",
        "expressionLanguage": "jq",
        "key": "${ .id }",
        "skipable": true,
        "title": {"en": "Fake Title", "fr": "Faux Titre"},
        "subject": "${ \"Review \" + .name }",
        "description": {"en": {"short": "Fake", "long": ["Fake", "description"]}},
        "peopleAssignments": {
            "potentialOwners": [
                {"user": "fake-user@email.com"},
                {"users": {"withClaims": [{"type": "role", "value": "reviewer"}]}}
            ],
            "businessAdministrators": [
                {"users": {"inGenericRole": "businessAdministrator"}}
            ],
            "groups": [
                {"name": "fake-group", "members": [{"users": {"inGroup": "admins"}}]}
            ]
        },
        "inputData": {
            "schema": {"type": "object", "properties": {"id": {"type": "integer"}}},
            "state": {"id": 42}
        },
        "outputData": {"state": {"approved": false, "score": 0.75}},
        "form": {
            "data": {"state": {"comment": null}},
            "views": [
                {"type": "html", "template": "<p>${ .comment }</p>"},
                {"type": "json", "renderingMode": ["process", "render"], "template": {"widget": "textarea"}}
            ]
        },
        "subtasks": [
            {"name": "check", "task": "fake-namespace.fake-other-task:1.0.0-unitTest", "input": {"id": "${ .id }"}}
        ],
        "subtaskExecutionMode": "parallel",
        "deadlines": [
            {
                "name": "expire",
                "type": "start",
                "elapsesAt": "2030-01-01T00:00:00+00:00",
                "elapsesAfter": "PT30M",
                "escalations": [
                    {
                        "name": "notify",
                        "condition": "${ .priority > 3 }",
                        "action": {
                            "notification": {
                                "name": "late",
                                "views": [{"type": "text", "renderingMode": "render", "template": "late"}],
                                "input": {"level": 2},
                                "recipients": [{"user": "manager"}]
                            }
                        }
                    },
                    {
                        "name": "reassign",
                        "action": {"reassignment": {"to": {"user": "fallback"}}}
                    },
                    {
                        "name": "follow-up",
                        "action": {"subtask": {"name": "escalate", "task": "fake-namespace.escalation"}}
                    }
                ]
            }
        ],
        "completionBehaviors": [
            {
                "name": "reviewed",
                "type": "automatic",
                "condition": "${ $CONTEXT.form.data }",
                "output": {"fakeProperty": "fake-data"}
            },
            {"name": "fallback", "type": "manual"}
        ],
        "outcomes": [
            {"name": "approved", "condition": "${ .approved }", "value": {"en": "Approved", "fr": "Approuvé"}},
            {"name": "rejected", "value": "Rejected"}
        ],
        "annotations": {"owner": "team-a", "tier": "1"},
        "metadata": {"source": "test", "tags": ["a", "b"], "nested": {"deep": {"deeper": [1, 2.5, true, null]}}}
    })
}

fn to_bytes(node: &serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(node).unwrap()
}

#[test]
fn test_full_json_document_round_trip() {
    let node = full_document();
    let definition = decode_document(&to_bytes(&node), DocumentFormat::Json).unwrap();

    assert_eq!(definition.id(), "fake-namespace.fake-task:0.1.0");
    assert_eq!(definition.routing_mode, HumanTaskRoutingMode::Parallel);
    assert_eq!(definition.subtask_execution_mode, SubtaskExecutionMode::Parallel);
    assert!(definition.skipable);
    assert!(definition.subject.as_ref().unwrap().is_expression());
    assert!(definition.title.as_ref().unwrap().as_localized().is_some());
    let deadline = &definition.deadlines[0];
    assert_eq!(deadline.deadline_type, DeadlineType::Start);
    assert_eq!(deadline.elapses_after, Some(IsoDuration::minutes(30)));
    assert_eq!(deadline.escalations.len(), 3);
    assert_eq!(
        definition.completion_behaviors[1].behavior_type,
        CompletionBehaviorType::Manual
    );
    assert_eq!(
        definition.people_assignments.as_ref().unwrap().business_administrators[0]
            .users
            .as_ref()
            .unwrap()
            .in_generic_role,
        Some(GenericHumanRole::BusinessAdministrator)
    );
    let views = &definition.form.as_ref().unwrap().views;
    assert!(views[1].rendering_mode.contains(ViewRenderingMode::Render));

    // field order and content survive
    let encoded = definition.encode::<JsonAdapter>();
    assert_eq!(
        serde_json::to_string(&encoded).unwrap(),
        serde_json::to_string(&node).unwrap()
    );
}

#[test]
fn test_yaml_round_trip_and_cross_backend_equivalence() {
    let original = decode_document(&to_bytes(&full_document()), DocumentFormat::Json).unwrap();

    let yaml = encode_document(&original, DocumentFormat::Yaml).unwrap();
    let from_yaml = decode_document(&yaml, DocumentFormat::Yaml).unwrap();
    assert_eq!(from_yaml, original);

    let json = encode_document(&original, DocumentFormat::Json).unwrap();
    let from_json = decode_document(&json, DocumentFormat::Json).unwrap();
    assert_eq!(from_json, from_yaml);

    // yaml output re-encodes to identical yaml
    assert_eq!(encode_document(&from_yaml, DocumentFormat::Yaml).unwrap(), yaml);
}

#[test]
fn test_yaml_output_keeps_field_order() {
    let definition = decode_document(&to_bytes(&full_document()), DocumentFormat::Json).unwrap();
    let yaml = encode_document(&definition, DocumentFormat::Yaml).unwrap();
    let node = YamlAdapter::parse(std::str::from_utf8(&yaml).unwrap()).unwrap();
    let keys = YamlAdapter::entries(&node).into_iter().map(|(k, _)| k).join(",");
    let expected = full_document()
        .as_object()
        .unwrap()
        .keys()
        .join(",");
    assert_eq!(keys, expected);
}

#[test]
fn test_sparse_document_gets_no_spurious_fields() {
    let yaml = "name: fake-task\nnamespace: fake-namespace\nversion: 0.1.0\nspecVersion: 0.1.0\n";
    let definition = decode_document(yaml.as_bytes(), DocumentFormat::Yaml).unwrap();
    let encoded = definition.encode::<JsonAdapter>();
    assert_eq!(
        encoded,
        json!({
            "id": "fake-namespace.fake-task:0.1.0",
            "name": "fake-task",
            "namespace": "fake-namespace",
            "version": "0.1.0",
            "specVersion": "0.1.0",
            "routingMode": "none",
            "expressionLanguage": "jq"
        })
    );
}

#[test]
fn test_stored_id_is_recomputed() {
    let mut node = full_document();
    node["id"] = json!("somebody.else:9.9.9");
    let definition = decode_document(&to_bytes(&node), DocumentFormat::Json).unwrap();
    assert_eq!(definition.id(), "fake-namespace.fake-task:0.1.0");
    assert_eq!(
        definition.encode::<JsonAdapter>()["id"],
        json!("fake-namespace.fake-task:0.1.0")
    );
}

#[test]
fn test_unknown_fields_are_ignored() {
    let mut node = full_document();
    node["futureField"] = json!({"anything": [1, 2]});
    node["deadlines"][0]["futureField"] = json!(true);
    let definition = decode_document(&to_bytes(&node), DocumentFormat::Json).unwrap();
    let encoded = definition.encode::<JsonAdapter>();
    assert!(encoded.get("futureField").is_none());
    assert_eq!(encoded, full_document());
}

#[test]
fn test_decode_failures_are_atomic_and_located() {
    let cases = [
        ("/deadlines/0/elapsesAfter", json!("30 minutes"), HumanTaskError::MalformedDuration("30 minutes".to_string())),
        ("/deadlines/0/elapsesAt", json!("tomorrow"), HumanTaskError::MalformedInstant("tomorrow".to_string())),
        (
            "/routingMode",
            json!("sequential "),
            HumanTaskError::UnknownEnumTag {
                enum_name: "HumanTaskRoutingMode",
                tag: "sequential ".to_string(),
            },
        ),
        (
            "/completionBehaviors/0/condition",
            json!("$CONTEXT.form.data"),
            HumanTaskError::InvalidExpressionFormat {
                argument: "/completionBehaviors/0/condition".to_string(),
                value: "$CONTEXT.form.data".to_string(),
            },
        ),
    ];
    for (pointer, bad, expected) in cases {
        let mut node = full_document();
        *node.pointer_mut(pointer).unwrap() = bad;
        let res = decode_document(&to_bytes(&node), DocumentFormat::Json);
        assert_eq!(res, Err(expected), "pointer: {pointer}");
    }

    let mut node = full_document();
    node["deadlines"][0]["escalations"][1]
        .as_object_mut()
        .unwrap()
        .remove("action");
    assert_eq!(
        decode_document(&to_bytes(&node), DocumentFormat::Json),
        Err(HumanTaskError::MissingRequiredField(
            "/deadlines/0/escalations/1/action".to_string()
        ))
    );
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        decode_document(b"{\"name\": ", DocumentFormat::Json),
        Err(HumanTaskError::ParseError(_))
    ));
    assert!(matches!(
        decode_document(b"name: [unclosed", DocumentFormat::Yaml),
        Err(HumanTaskError::ParseError(_))
    ));
    assert!(matches!(
        decode_document(b"- a\n- b\n", DocumentFormat::Yaml),
        Err(HumanTaskError::UnexpectedNodeKind { .. })
    ));
}

#[test]
fn test_built_definition_round_trips() {
    let definition = HumanTaskDefinitionBuilder::new()
        .with_name("Expense Review")
        .unwrap()
        .with_namespace("acme.finance")
        .unwrap()
        .with_version("2.0.0")
        .unwrap()
        .with_title_in("en", "Review ${ .amount }")
        .unwrap()
        .with_subject("${ .requester }")
        .unwrap()
        .add_deadline(|d| {
            d.with_name("expire")?
                .of_type(DeadlineType::Completion)
                .elapses_after(IsoDuration::from_millis(90 * 60 * 1000))
                .escalates(|e| e.with_name("notify")?.reassign(|r| r.to(|p| p.user("boss"))))
        })
        .unwrap()
        .use_completion_behavior(|c| {
            Ok(c.with_name("approved")?
                .of_type(CompletionBehaviorType::Automatic)
                .when(Some("${ .approved }"))?
                .set_output(structure(&json!({"status": "approved", "amount": "${ .amount }"}))))
        })
        .unwrap()
        .add_outcome(|o| o.with_name("done")?.outputs_in("en", "Done"))
        .unwrap()
        .use_metadata(Value::from(7i64))
        .build()
        .unwrap();

    for format in [DocumentFormat::Json, DocumentFormat::Yaml] {
        let bytes = encode_document(&definition, format).unwrap();
        let decoded = decode_document(&bytes, format).unwrap();
        assert_eq!(decoded, definition, "format: {format}");
    }
    let json: serde_json::Value =
        serde_json::from_slice(&encode_document(&definition, DocumentFormat::Json).unwrap())
            .unwrap();
    assert_eq!(json["id"], json!("acme.finance.expense-review:2.0.0"));
    assert_eq!(json["deadlines"][0]["elapsesAfter"], json!("PT1H30M"));
}

#[test]
fn test_compact_and_pretty_json() {
    let definition: HumanTaskDefinition =
        decode_document(&to_bytes(&full_document()), DocumentFormat::Json).unwrap();
    let compact = HumanTaskCodec::new(CodecConfig::new(Some(false), None))
        .encode_document(&definition, DocumentFormat::Json)
        .unwrap();
    let pretty = HumanTaskCodec::new(CodecConfig::new(Some(true), None))
        .encode_document(&definition, DocumentFormat::Json)
        .unwrap();
    assert!(!compact.contains(&b'\n'));
    assert!(pretty.contains(&b'\n'));
    let a: serde_json::Value = serde_json::from_slice(&compact).unwrap();
    let b: serde_json::Value = serde_json::from_slice(&pretty).unwrap();
    assert_eq!(a, b);
}

fn minimal_builder() -> HumanTaskDefinitionBuilder {
    HumanTaskDefinitionBuilder::new()
        .with_name("fake-task")
        .unwrap()
        .with_namespace("fake-namespace")
        .unwrap()
        .with_version("1.0.0")
        .unwrap()
}

fn assert_round_trips(definition: &HumanTaskDefinition) {
    for format in [DocumentFormat::Json, DocumentFormat::Yaml] {
        let bytes = encode_document(definition, format).unwrap();
        assert_eq!(
            &decode_document(&bytes, format).unwrap(),
            definition,
            "format: {format}"
        );
    }
}

#[test]
fn test_explicit_null_values_survive() {
    let definition = minimal_builder()
        .with_title(Value::null())
        .unwrap()
        .with_input_data(Some(Value::null()), None)
        .add_outcome(|o| o.with_name("done")?.outputs(Value::null()))
        .unwrap()
        .use_metadata(Value::null())
        .build()
        .unwrap();
    assert_round_trips(&definition);

    let json = definition.encode::<JsonAdapter>();
    assert_eq!(json["metadata"], serde_json::Value::Null);
    assert_eq!(json["title"], serde_json::Value::Null);

    // typed fields still read null as absent
    let node = json!({
        "name": "t", "namespace": "n", "version": "1.0.0", "specVersion": "0.1.0",
        "key": null, "routingMode": null, "metadata": null
    });
    let decoded = decode_document(&to_bytes(&node), DocumentFormat::Json).unwrap();
    assert_eq!(decoded.key, None);
    assert_eq!(decoded.routing_mode, HumanTaskRoutingMode::None);
    assert_eq!(decoded.metadata, Some(Value::null()));
}

#[test]
fn test_builder_values_match_field_kinds() {
    let definition = minimal_builder()
        .with_title(structure(&json!({"en": "Review", "fr": "Revue"})))
        .unwrap()
        .with_description(structure(&json!({"en": {"short": "Review"}})))
        .unwrap()
        .add_outcome(|o| o.with_name("done")?.outputs(structure(&json!({"en": "Done"}))))
        .unwrap()
        .use_metadata(Value::localized([("en", Value::from("x"))]))
        .build()
        .unwrap();
    assert!(definition.title.as_ref().unwrap().as_localized().is_some());
    assert!(definition.metadata.as_ref().unwrap().as_mapping().is_some());
    assert_round_trips(&definition);

    assert_eq!(
        minimal_builder()
            .with_title(structure(&json!({"title": "Review"})))
            .unwrap_err(),
        HumanTaskError::InvalidLanguageCode("title".to_string())
    );
}

#[test]
fn test_deeply_nested_metadata() {
    let mut metadata = json!("leaf");
    for _ in 0..200 {
        metadata = json!({ "nested": metadata });
    }
    let definition = minimal_builder()
        .use_metadata(structure(&metadata))
        .build()
        .unwrap();

    let bytes = encode_document(&definition, DocumentFormat::Json).unwrap();
    assert_eq!(
        decode_document(&bytes, DocumentFormat::Json).unwrap(),
        definition
    );
    // YAML refuses to write what its parser cannot read back
    assert!(matches!(
        encode_document(&definition, DocumentFormat::Yaml),
        Err(HumanTaskError::SerializeError(_))
    ));
}
