//! End-to-end resolution of representative schemas
//!
//! Drives the public `Generator` API with inline drafts and checks the
//! resolved models, relations and synthesized migrations.

use draftsman_codegen::{Generator, ResolvedSchema};
use draftsman_orm::{ModelType, RelationKind, RelationType};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("draftsman_codegen=debug")
        .try_init();
}

fn resolve(yaml: &str) -> ResolvedSchema {
    init_tracing();
    Generator::default()
        .generate_yaml(yaml)
        .expect("schema should resolve")
}

#[test]
fn test_many_to_many_synthesizes_one_pivot() {
    let schema = resolve(
        r#"
models:
  User:
    name: string
    roles: belongsToMany
  Role:
    name: string
    users: belongsToMany
"#,
    );

    let roles = schema.relation("User", "roles").unwrap();
    let users = schema.relation("Role", "users").unwrap();
    assert_eq!(roles.relation_type(), RelationType::BelongsToMany);
    assert_eq!(roles.model(), Some("Role"));
    assert_eq!(users.model(), Some("User"));

    let pivot = schema.migration("role_user").expect("pivot migration");
    assert!(pivot.from_guessed_pivot);
    assert!(pivot.model.is_none());
    assert_eq!(
        pivot.blueprint_lines(),
        vec![
            "$table->unsignedBigInteger('role_id')",
            "$table->unsignedBigInteger('user_id')",
            "$table->primary(['role_id', 'user_id'])",
        ]
    );
    assert_eq!(
        schema.migrations.values().filter(|migration| migration.from_guessed_pivot).count(),
        1
    );
}

#[test]
fn test_belongs_to_synthesizes_key_column() {
    let schema = resolve(
        r#"
models:
  User:
    name: string
  Post:
    title: string
    author: belongsTo:User
"#,
    );

    let post = schema.model("Post").unwrap();
    let column = post.columns.get("author").unwrap();
    assert_eq!(column.name, "user_id");
    assert_eq!(column.column_type, "unsignedBigInteger");
    assert_eq!(column.relation.as_deref(), Some("author"));
    assert_eq!(
        schema.relation_call("Post", "author").unwrap(),
        "belongsTo(User::class, 'user_id')"
    );
}

#[test]
fn test_morph_many_infers_the_only_morph_to() {
    let schema = resolve(
        r#"
models:
  Photo:
    path: string
    tags: morphMany
  Video:
    url: string
    tags: morphMany
  Tag:
    name: string
    taggable: morphTo
"#,
    );

    for owner in ["Photo", "Video"] {
        let RelationKind::MorphMany(tags) = &schema.relation(owner, "tags").unwrap().kind else {
            panic!("{} tags is not morphMany", owner);
        };
        assert_eq!(tags.relation_key, "taggable");
    }

    let tag = schema.model("Tag").unwrap();
    let taggable = tag.relation("taggable").unwrap().as_morph_to().unwrap();
    assert_eq!(taggable.models, vec!["Photo", "Video"]);
    assert_eq!(
        tag.columns.get("taggable").unwrap().blueprint(),
        "$table->morphs('taggable')"
    );
}

#[test]
fn test_through_relation_guessed_from_name() {
    let schema = resolve(
        r#"
models:
  Country:
    name: string
    userPosts: hasManyThrough
  User:
    name: string
    country: belongsTo
  Post:
    title: string
    user: belongsTo
"#,
    );

    let RelationKind::HasManyThrough(through) = &schema.relation("Country", "userPosts").unwrap().kind else {
        panic!("userPosts is not hasManyThrough");
    };
    assert_eq!(through.model, "Post");
    assert_eq!(through.through, "User");
    assert_eq!(
        schema.relation_call("Country", "userPosts").unwrap(),
        "hasManyThrough(Post::class, User::class)"
    );
}

#[test]
fn test_uuid_key_wins_over_declared_id() {
    let schema = resolve(
        r#"
models:
  Post:
    id: ~
    uuid: ~
    title: string
"#,
    );

    let post = schema.model("Post").unwrap();
    assert!(post.has_uuid_primary_key());
    assert!(!post.has_auto_increment_primary_key());
    assert_eq!(
        schema.migration("posts").unwrap().blueprint_lines(),
        vec![
            "$table->uuid('id')->primary()",
            "$table->string('title')",
            "$table->timestamps()",
        ]
    );
}

#[test]
fn test_column_order_survives_relation_resolution() {
    let schema = resolve(
        r#"
models:
  Category:
    name: string
  Comment:
    body: text
    post: belongsTo
  Post:
    title: string
    category: belongsTo
    slug: string unique
    comments: hasMany
    commentable: morphTo nullable
  Video:
    posts: morphMany:Post
"#,
    );

    let posts = schema.migration("posts").unwrap();
    assert_eq!(
        posts.blueprint_lines(),
        vec![
            "$table->id()",
            "$table->string('title')",
            "$table->unsignedBigInteger('category_id')",
            "$table->string('slug')->unique()",
            "$table->nullableMorphs('commentable')",
            "$table->timestamps()",
        ]
    );
}

#[test]
fn test_user_model_detection_and_factories() {
    let schema = resolve(
        r#"
models:
  User:
    name: string
    email: string unique
    password: string
    rememberToken: ~
"#,
    );

    let user = schema.model("User").unwrap();
    assert_eq!(user.model_type, ModelType::User);
    assert!(user.hidden.contains("password"));
    assert!(user.hidden.contains("remember_token"));

    let factory = &schema.artifacts.factories["User"];
    assert_eq!(factory.fields.keys().collect::<Vec<_>>(), vec!["name", "email"]);
}

#[test]
fn test_resolution_is_deterministic() {
    let yaml = r#"
namespace: Shop
models:
  Customer:
    name: string
    orders: hasMany
    addresses: morphMany:Address
  Order:
    customer: belongsTo
    total: decimal:10,2
    products: belongsToMany
  Product:
    name: string
    price: decimal:8,2
    tags: morphToMany
  Tag:
    name: string
    products: morphedByMany
  Address:
    line: string
    addressable: morphTo
migrations:
  audit_log:
    event: string
"#;

    let first = resolve(yaml).to_json().unwrap();
    let second = resolve(yaml).to_json().unwrap();
    assert_eq!(first, second);
    assert!(first.contains("\"namespace\": \"Shop\""));
}
