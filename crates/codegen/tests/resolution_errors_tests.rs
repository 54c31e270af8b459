//! Fatal schema conditions and the messages they produce

use draftsman_codegen::Generator;

fn error_of(yaml: &str) -> String {
    let err = Generator::default()
        .generate_yaml(yaml)
        .expect_err("schema should be rejected");
    assert!(err.is_logic(), "unexpected error kind: {:?}", err);
    err.to_string()
}

#[test]
fn test_two_auto_increment_columns() {
    let message = error_of(
        r#"
models:
  Ledger:
    columns:
      id: increments
      sequence: bigIncrements
      amount: integer
"#,
    );
    assert_eq!(message, "Model [Ledger] has more than one auto-incrementing column");
}

#[test]
fn test_auto_increment_error_precedes_relation_errors() {
    let message = error_of(
        r#"
models:
  Ledger:
    columns:
      id: increments
      sequence: bigIncrements
      owner: belongsTo:Nobody
"#,
    );
    assert_eq!(message, "Model [Ledger] has more than one auto-incrementing column");
}

#[test]
fn test_model_must_be_a_map() {
    assert_eq!(
        error_of("models:\n  Post: [title, body]\n"),
        "Model [Post] must be an associative array with a columns key"
    );
    assert_eq!(
        error_of("models:\n  Post: {}\n"),
        "Model [Post] must be an associative array with a columns key"
    );
}

#[test]
fn test_duplicate_identities() {
    assert_eq!(
        error_of("models:\n  Post:\n    title: string\n  Blog/post:\n    title: string\n"),
        "Models [Post] and [Blog/post] share the class name [Post]"
    );
    assert_eq!(
        error_of("models:\n  Post:\n    title: string\nmigrations:\n  posts:\n    title: string\n"),
        "Migration [posts] uses the table of model [Post]"
    );
}

#[test]
fn test_non_existent_targets() {
    assert_eq!(
        error_of("models:\n  Post:\n    author: belongsTo:Writer\n"),
        "Relation [author] of model [Post] points to a non-existent model [Writer]"
    );
}

#[test]
fn test_with_default_restriction() {
    assert_eq!(
        error_of("models:\n  User:\n    posts: hasMany withDefault\n  Post:\n    user: belongsTo\n"),
        "Relation [posts] of model [User] cannot use withDefault, only belongsTo, hasOne, hasOneThrough and morphOne relations can"
    );
}

#[test]
fn test_missing_inverse_belongs_to() {
    assert_eq!(
        error_of("models:\n  User:\n    posts: hasMany\n  Post:\n    title: string\n"),
        "Target model [Post] of relation [posts] of model [User] must contain a belongsTo relation to [User]"
    );
}

#[test]
fn test_ambiguous_morph_to() {
    assert_eq!(
        error_of(
            "models:\n  Post:\n    image: morphOne\n  Image:\n    imageable: morphTo\n    attachable: morphTo\n"
        ),
        "Model [Image] has more than one morphTo relation, pick one for relation [image] of model [Post]"
    );
}

#[test]
fn test_mixed_polymorphic_parents() {
    let message = error_of(
        "models:\n  Post:\n    uuid: uuid\n    comments: morphMany\n  Video:\n    comments: morphMany\n  Comment:\n    commentable: morphTo\n",
    );
    assert!(message.ends_with("must ALL use uuid or id"), "{}", message);
}

#[test]
fn test_morph_parent_with_string_key() {
    let message = error_of(
        "models:\n  Post:\n    comments: morphMany\n  Country:\n    code: string:2 primary\n    comments: morphMany\n  Comment:\n    commentable: morphTo\n",
    );
    assert_eq!(
        message,
        "Models [Post, Country] pointing to relation [commentable] of model [Comment] must ALL use uuid or id"
    );
}

#[test]
fn test_index_and_unique_on_relation_column() {
    assert_eq!(
        error_of("models:\n  User:\n    name: string\n  Post:\n    author: belongsTo:User index unique\n"),
        "Column [author] of model [Post] cannot be both index and unique"
    );
}

#[test]
fn test_two_primary_key_columns() {
    assert_eq!(
        error_of("models:\n  Country:\n    columns:\n      id: ~\n      code: string:2 primary\n"),
        "Model [Country] has more than one primary key column, [id] and [code]"
    );
}

#[test]
fn test_index_and_unique_on_one_column() {
    assert_eq!(
        error_of("models:\n  User:\n    email: string index unique\n"),
        "Column [email] of model [User] cannot be both index and unique"
    );
}

#[test]
fn test_unknown_hidden_column() {
    assert_eq!(
        error_of("models:\n  User:\n    columns:\n      name: string\n    hidden: [token]\n"),
        "Hidden column [token] of model [User] does not exist"
    );
}
