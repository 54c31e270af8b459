//! Faker provider guesses for factory fields.
//!
//! A column name is matched first; the column type is the fallback.

use draftsman_core::lexer::Argument;
use once_cell::sync::Lazy;
use regex::Regex;

static NAME_PROVIDERS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(^|_)e?mail(_address)?$", "safeEmail()"),
        (r"^(username|user_name|login|nickname)$", "userName()"),
        (r"^first_?name$", "firstName()"),
        (r"^(last_?name|surname)$", "lastName()"),
        (r"^(name|full_name)$", "name()"),
        (r"(^|_)company(_name)?$", "company()"),
        (r"(^|_)(phone|mobile|telephone)(_number)?$", "phoneNumber()"),
        (r"(^|_)(address|street)$", "streetAddress()"),
        (r"(^|_)city$", "city()"),
        (r"(^|_)(state|province)$", "state()"),
        (r"(^|_)(zip|zip_code|postcode|postal_code)$", "postcode()"),
        (r"(^|_)country$", "country()"),
        (r"(^|_)(url|website|link)$", "url()"),
        (r"^slug$", "slug()"),
        (r"(^|_)uuid$", "uuid()"),
        (r"(^|_)ip(_address)?$", "ipv4()"),
        (r"(^|_)colou?r$", "hexColor()"),
        (r"^latitude$", "latitude()"),
        (r"^longitude$", "longitude()"),
        (r"^password$", "password()"),
        (r"^(title|subject|headline)$", "sentence(4)"),
        (r"(^|_)(description|summary|excerpt)$", "text()"),
        (r"^(body|content)$", "paragraphs(3, true)"),
        (r"(^|_)(price|amount|cost|total)$", "randomFloat(2, 1, 1000)"),
    ]
    .into_iter()
    .filter_map(|(pattern, provider)| Regex::new(pattern).ok().map(|regex| (regex, provider)))
    .collect()
});

/// Provider guessed from a column name alone
pub fn provider_for_name(name: &str) -> Option<&'static str> {
    NAME_PROVIDERS
        .iter()
        .find(|(pattern, _)| pattern.is_match(name))
        .map(|(_, provider)| *provider)
}

/// Provider guessed from a column type and its arguments
pub fn provider_for_type(column_type: &str, arguments: &[Argument]) -> Option<String> {
    let provider = match column_type {
        "string" | "char" => "word()",
        "text" | "mediumText" | "longText" | "tinyText" => "paragraph()",
        "integer" | "bigInteger" | "mediumInteger" | "smallInteger" | "tinyInteger"
        | "unsignedInteger" | "unsignedBigInteger" | "unsignedMediumInteger"
        | "unsignedSmallInteger" | "unsignedTinyInteger" => "randomNumber()",
        "boolean" => "boolean()",
        "date" => "date()",
        "dateTime" | "dateTimeTz" | "timestamp" | "timestampTz" => "dateTime()",
        "time" | "timeTz" => "time()",
        "year" => "year()",
        "decimal" | "unsignedDecimal" | "float" | "double" => "randomFloat(2)",
        "uuid" => "uuid()",
        "ulid" => "uuid()",
        "ipAddress" => "ipv4()",
        "macAddress" => "macAddress()",
        "enum" | "set" if !arguments.is_empty() => {
            let choices: Vec<String> = arguments.iter().map(Argument::render).collect();
            return Some(format!("randomElement([{}])", choices.join(", ")));
        }
        _ => return None,
    };
    Some(provider.to_string())
}

/// Provider for a column: by name, then by type
pub fn guess_provider(name: &str, column_type: &str, arguments: &[Argument]) -> Option<String> {
    provider_for_name(name)
        .map(str::to_string)
        .or_else(|| provider_for_type(column_type, arguments))
}
