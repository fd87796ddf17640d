use netsecure_portal::models::{
    LoginResponse, MeResponse, OrganizationUpdate, PreregisterRequest, Role, UserProfile,
};
use serde_json::json;

// --- Role Normalization ---

#[test]
fn test_role_names_and_ids() {
    for raw in ["Administrator", "administrator", "ADMIN", "admin", " Admin "] {
        assert_eq!(raw.parse::<Role>().unwrap(), Role::Administrator, "{raw:?}");
    }
    assert_eq!("operator".parse::<Role>().unwrap(), Role::Operator);
    assert_eq!("User".parse::<Role>().unwrap(), Role::User);
    assert!("superuser".parse::<Role>().is_err());

    assert_eq!(Role::from_id(1), Some(Role::Administrator));
    assert_eq!(Role::from_id(2), Some(Role::Operator));
    assert_eq!(Role::from_id(3), Some(Role::User));
    assert_eq!(Role::from_id(4), None);
}

#[test]
fn test_role_deserializes_from_name_or_id() {
    let by_name: Role = serde_json::from_value(json!("admin")).unwrap();
    let by_id: Role = serde_json::from_value(json!(2)).unwrap();
    assert_eq!(by_name, Role::Administrator);
    assert_eq!(by_id, Role::Operator);

    assert!(serde_json::from_value::<Role>(json!(9)).is_err());
    // Serialization always emits the canonical name.
    assert_eq!(serde_json::to_value(Role::Administrator).unwrap(), json!("Administrator"));
}

#[test]
fn test_profile_accepts_legacy_field_names() {
    let user: UserProfile = serde_json::from_value(json!({
        "user_id": "u-3",
        "email": "legacy@netsecure.test",
        "role_id": 3,
    }))
    .unwrap();

    assert_eq!(user.id.as_deref(), Some("u-3"));
    assert_eq!(user.role, Role::User);
    assert!(user.permissions.is_empty());
    assert_eq!(user.site_ids, None);
}

// --- Backend Payloads ---

#[test]
fn test_login_response_with_null_organization() {
    let login: LoginResponse = serde_json::from_value(json!({
        "message": "Login successful",
        "token": "jwt",
        "role": "Administrator",
        "user_id": "u-1",
        "organization_id": null,
    }))
    .unwrap();

    let user = UserProfile::from_login("admin@netsecure.test", &login);
    assert_eq!(user.role, Role::Administrator);
    assert_eq!(user.organization_id, None);
    assert!(!user.has_organization());
    assert_eq!(user.email, "admin@netsecure.test");
}

#[test]
fn test_login_response_blank_organization_is_none() {
    let login: LoginResponse = serde_json::from_value(json!({
        "token": "jwt",
        "role": "operator",
        "organization_id": "",
    }))
    .unwrap();
    assert_eq!(UserProfile::from_login("op@netsecure.test", &login).organization_id, None);
}

#[test]
fn test_me_response_to_profile() {
    let me: MeResponse = serde_json::from_value(json!({
        "user": {
            "id": "u-9",
            "email": "viewer@netsecure.test",
            "role_id": 3,
            "organization_id": "org-2",
        },
        "permissions": ["sites.read"],
        "site_permissions": [
            { "site_id": "s-1", "read_access": true },
            { "site_id": "s-2", "write_access": true },
            { "site_id": "s-3", "can_receive_alerts": true },
        ],
    }))
    .unwrap();

    let user = UserProfile::from(me);
    assert_eq!(user.id.as_deref(), Some("u-9"));
    assert_eq!(user.role, Role::User);
    assert!(user.permissions.contains("sites.read"));

    let mut site_ids: Vec<_> = user.site_ids.unwrap().into_iter().collect();
    site_ids.sort();
    assert_eq!(site_ids, vec!["s-1", "s-2"]);
}

#[test]
fn test_me_response_without_grants_has_no_site_scope() {
    let me: MeResponse = serde_json::from_value(json!({
        "user": { "id": "u-1", "email": "admin@netsecure.test", "role_id": 1 },
    }))
    .unwrap();

    let user = UserProfile::from(me);
    assert_eq!(user.site_ids, None);
    assert!(user.permissions.is_empty());
}

// --- Request Payloads ---

#[test]
fn test_optional_request_fields_are_omitted() {
    let request = PreregisterRequest {
        mac: "AA:BB".to_string(),
        site_id: None,
    };
    assert_eq!(serde_json::to_value(&request).unwrap(), json!({ "mac": "AA:BB" }));

    let update = OrganizationUpdate {
        name: Some("Acme".to_string()),
        contact_phone: Some("+39 011 000000".to_string()),
        ..Default::default()
    };
    assert_eq!(
        serde_json::to_value(&update).unwrap(),
        json!({ "name": "Acme", "contact_phone": "+39 011 000000" })
    );
}
