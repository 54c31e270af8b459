//! Naming heuristics for omitted relation details.
//!
//! These are string guesses: a candidate only counts when a model with that
//! key or class exists.

use crate::context::SchemaContext;
use draftsman_core::inflector::{plural, singular, snake, studly};
use draftsman_orm::{ModelKey, RelationType};

/// Candidate model names for a relation declared without a target
pub fn model_candidates(kind: RelationType, name: &str) -> Vec<String> {
    let as_is = studly(name);
    let singularized = studly(&singular(name));
    let ordered = match kind {
        RelationType::BelongsTo | RelationType::MorphOne => [as_is, singularized],
        _ => [singularized, as_is],
    };

    let mut candidates = Vec::with_capacity(2);
    for candidate in ordered {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// First candidate that names an existing model
pub fn guess_model(context: &SchemaContext, kind: RelationType, name: &str) -> Option<ModelKey> {
    model_candidates(kind, name)
        .iter()
        .find_map(|candidate| context.find_model(candidate))
        .map(str::to_string)
}

/// `(through, model)` class pairs from splitting a through relation name,
/// e.g. `userPosts` gives `("User", "Post")`
pub fn through_candidates(name: &str) -> Vec<(String, String)> {
    let snaked = snake(name);
    snaked
        .match_indices('_')
        .map(|(index, _)| {
            let (prefix, suffix) = (&snaked[..index], &snaked[index + 1..]);
            (studly(&singular(prefix)), studly(&singular(suffix)))
        })
        .filter(|(through, model)| !through.is_empty() && !model.is_empty())
        .collect()
}

/// Conventional pivot table of two classes, e.g. `role_user`
pub fn pivot_table(first_class: &str, second_class: &str) -> String {
    let mut names = [singular(&snake(first_class)), singular(&snake(second_class))];
    names.sort();
    names.join("_")
}

/// Default morph name of a morphable class, e.g. `taggable` for `Tag`
pub fn morph_name(class: &str) -> String {
    let base = snake(class);
    let chars: Vec<char> = base.chars().collect();
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u');

    // single syllable ending consonant-vowel-consonant doubles its last letter
    let doubles = match chars.as_slice() {
        [.., a, b, c] => {
            !is_vowel(*a)
                && is_vowel(*b)
                && !is_vowel(*c)
                && c.is_ascii_lowercase()
                && !matches!(c, 'w' | 'x' | 'y')
                && chars.iter().filter(|c| is_vowel(**c)).count() == 1
        }
        _ => false,
    };

    match chars.last() {
        Some(last) if doubles => format!("{}{}able", base, last),
        _ => format!("{}able", base),
    }
}

/// Pivot table of a polymorphic many-to-many relation
pub fn morph_table(morph_name: &str) -> String {
    plural(morph_name)
}

/// Conventional foreign key referencing `class`, e.g. `user_id`
pub fn foreign_key(class: &str, primary_column: &str) -> String {
    format!("{}_{}", snake(class), primary_column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_candidates_order() {
        assert_eq!(model_candidates(RelationType::BelongsTo, "author"), vec!["Author"]);
        assert_eq!(
            model_candidates(RelationType::HasMany, "posts"),
            vec!["Post", "Posts"]
        );
        assert_eq!(
            model_candidates(RelationType::MorphOne, "images"),
            vec!["Images", "Image"]
        );
        assert_eq!(
            model_candidates(RelationType::BelongsToMany, "blog_posts"),
            vec!["BlogPost", "BlogPosts"]
        );
    }

    #[test]
    fn test_through_candidates() {
        assert_eq!(
            through_candidates("userPosts"),
            vec![("User".to_string(), "Post".to_string())]
        );
        assert_eq!(
            through_candidates("blog_post_comments"),
            vec![
                ("Blog".to_string(), "PostComment".to_string()),
                ("BlogPost".to_string(), "Comment".to_string()),
            ]
        );
        assert!(through_candidates("posts").is_empty());
    }

    #[test]
    fn test_table_names() {
        assert_eq!(pivot_table("User", "Role"), "role_user");
        assert_eq!(pivot_table("BlogPost", "Tag"), "blog_post_tag");
        assert_eq!(morph_name("Tag"), "taggable");
        assert_eq!(morph_name("Comment"), "commentable");
        assert_eq!(morph_name("Image"), "imageable");
        assert_eq!(morph_name("User"), "userable");
        assert_eq!(morph_table("taggable"), "taggables");
        assert_eq!(foreign_key("BlogPost", "id"), "blog_post_id");
    }
}
