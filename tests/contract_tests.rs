use gadgetledger::{
    Gadget, GadgetContract, InMemoryStore, Invocation, RecordStore, Response,
};
use serde_json::json;

fn contract() -> GadgetContract<InMemoryStore> {
    GadgetContract::new(InMemoryStore::new())
}

async fn invoke(contract: &GadgetContract<InMemoryStore>, function: &str, args: &[&str]) -> Response {
    contract
        .invoke(&Invocation::new(function, args.iter().copied()))
        .await
}

fn read_json(response: &Response) -> serde_json::Value {
    serde_json::from_slice(response.payload().expect("success payload")).unwrap()
}

#[tokio::test]
async fn init_always_succeeds_without_touching_the_store() {
    let contract = contract();
    let response = contract.init(&Invocation::new("init", ["anything"])).await;
    assert_eq!(response, Response::empty());
    assert!(contract.store().is_empty().await);
}

#[tokio::test]
async fn gadget_lifecycle_end_to_end() {
    let contract = contract();

    let created = invoke(&contract, "createGadget", &["m1", "Red", "4", "Alice"]).await;
    assert_eq!(created, Response::empty());

    let read = invoke(&contract, "readGadget", &["m1"]).await;
    assert_eq!(
        read_json(&read),
        json!({"docType": "gadget", "model": "m1", "color": "red", "make": 4, "owner": "alice"})
    );

    let transferred = invoke(&contract, "changeGadget", &["m1", "Bob"]).await;
    assert!(transferred.is_success());
    assert_eq!(
        read_json(&invoke(&contract, "readGadget", &["m1"]).await),
        json!({"docType": "gadget", "model": "m1", "color": "red", "make": 4, "owner": "bob"})
    );

    assert!(invoke(&contract, "delete", &["m1"]).await.is_success());
    let gone = invoke(&contract, "readGadget", &["m1"]).await;
    assert_eq!(gone.message(), Some("Gadget does not exist: m1"));
}

#[tokio::test]
async fn unknown_method_is_a_failure_envelope() {
    let contract = contract();
    let response = invoke(&contract, "burnGadget", &["m1"]).await;
    assert_eq!(response, Response::failure("no method of name: burnGadget found"));
}

#[tokio::test]
async fn create_twice_conflicts_and_keeps_first_record() {
    let contract = contract();
    assert!(invoke(&contract, "createGadget", &["m1", "Red", "4", "Alice"]).await.is_success());
    let before = contract.store().snapshot().await;

    let second = invoke(&contract, "createGadget", &["m1", "Blue", "9", "Mallory"]).await;
    assert_eq!(second.message(), Some("This gadget already exists: m1"));
    assert_eq!(contract.store().snapshot().await, before);
}

#[tokio::test]
async fn create_validates_arguments() {
    let contract = contract();

    for args in [&["m1", "red", "4"][..], &["m1", "red", "4", "alice", "extra"][..], &[][..]] {
        let response = invoke(&contract, "createGadget", args).await;
        assert_eq!(
            response.message(),
            Some("Incorrect number of arguments. Expecting 4")
        );
    }

    for make in ["four", "4.5", "", "4x"] {
        let response = invoke(&contract, "createGadget", &["m1", "red", make, "alice"]).await;
        assert_eq!(response.message(), Some("gadgetMake must be a numeric string"));
    }

    assert!(contract.store().is_empty().await);
}

#[tokio::test]
async fn read_validates_arguments() {
    let contract = contract();

    let none = invoke(&contract, "readGadget", &[]).await;
    assert_eq!(
        none.message(),
        Some("Incorrect number of arguments. Expecting name of the gadget to query")
    );
    let two = invoke(&contract, "readGadget", &["a", "b"]).await;
    assert!(!two.is_success());

    let empty = invoke(&contract, "readGadget", &[""]).await;
    assert_eq!(empty.message(), Some("gadget name must not be empty"));

    let missing = invoke(&contract, "readGadget", &["never"]).await;
    assert_eq!(missing.message(), Some("Gadget does not exist: never"));
}

#[tokio::test]
async fn transfer_changes_only_owner() {
    let contract = contract();
    invoke(&contract, "createGadget", &["m7", "GREEN", "12", "Dana"]).await;

    assert!(invoke(&contract, "changeGadget", &["m7", "ERIN", "ignored"]).await.is_success());

    let stored = contract.store().get("m7").await.unwrap();
    let gadget = Gadget::decode(&stored, "gadget").unwrap();
    assert_eq!(gadget, Gadget::new("gadget", "m7", "green", 12, "erin"));
}

#[tokio::test]
async fn transfer_keeps_fields_outside_the_record_type() {
    let contract = contract();
    let stored = br#"{"docType":"gadget","model":"m1","color":"red","make":4,"owner":"alice","serial":"SN-9"}"#;
    contract.store().put("m1", stored.to_vec()).await.unwrap();

    assert!(invoke(&contract, "changeGadget", &["m1", "Bob"]).await.is_success());

    assert_eq!(
        read_json(&invoke(&contract, "readGadget", &["m1"]).await),
        json!({"docType": "gadget", "model": "m1", "color": "red", "make": 4, "owner": "bob", "serial": "SN-9"})
    );
}

#[tokio::test]
async fn transfer_of_missing_gadget_fails() {
    let contract = contract();
    let response = invoke(&contract, "changeGadget", &["ghost", "bob"]).await;
    assert_eq!(response.message(), Some("gadget does not exist"));
    assert!(contract.store().is_empty().await);
}

#[tokio::test]
async fn transfer_of_undecodable_record_fails_without_writing() {
    let contract = contract();
    contract.store().put("m1", b"not a gadget".to_vec()).await.unwrap();

    let response = invoke(&contract, "changeGadget", &["m1", "bob"]).await;
    assert_eq!(response.message(), Some("Failed to decode JSON of: m1"));
    assert_eq!(contract.store().get("m1").await.unwrap(), b"not a gadget".to_vec());
}

#[tokio::test]
async fn delete_is_permissive_and_idempotent() {
    let contract = contract();

    assert!(invoke(&contract, "delete", &["never-existed"]).await.is_success());

    invoke(&contract, "createGadget", &["m1", "red", "1", "a"]).await;
    assert!(invoke(&contract, "delete", &["m1"]).await.is_success());
    assert!(invoke(&contract, "delete", &["m1"]).await.is_success());

    let wrong_arity = invoke(&contract, "delete", &[]).await;
    assert_eq!(
        wrong_arity.message(),
        Some("Incorrect number of arguments. Expecting 1")
    );
}

#[tokio::test]
async fn created_record_can_be_recreated_after_delete() {
    let contract = contract();
    invoke(&contract, "createGadget", &["m1", "red", "1", "a"]).await;
    invoke(&contract, "delete", &["m1"]).await;

    let again = invoke(&contract, "createGadget", &["m1", "blue", "2", "b"]).await;
    assert!(again.is_success());
    assert_eq!(read_json(&invoke(&contract, "readGadget", &["m1"]).await)["color"], "blue");
}
