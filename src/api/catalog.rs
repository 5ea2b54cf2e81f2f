//! Purpose: Hold the static template tables for the supported lifecycle operations.
//! Exports: `REQUEST_TEMPLATES`, `RESPONSE_TEMPLATES`, lookup helpers.
//! Role: The declarative replacement for one-script-per-message-type.
//! Invariants: Tables are fixed policy; adding an operation means adding a row.
//! Invariants: Field lists and constant fields follow SOL003 v2.4.1 / SOL005 v3.3.1.

use crate::api::template::{FieldCopy, RequestTemplate, ResponseTemplate};
use crate::core::error::{Error, ErrorKind};

const SOL003: &str = "ETSI SOL003 v2.4.1";
const SOL005: &str = "ETSI SOL005 v3.3.1";

/// Prefix set shared by the instantiate requests, which accept external
/// connectivity and VIM access data alongside free-form additional params.
const INSTANTIATE_PREFIXES: &[&str] = &[
    "additionalParams.",
    "extVirtualLinks.",
    "extManagedVirtualLinks.",
    "vimConnectionInfo.",
];

const PARAMS_ONLY: &[&str] = &["additionalParams."];

pub const REQUEST_TEMPLATES: &[RequestTemplate] = &[
    RequestTemplate {
        name: "InstantiateVnfRequest",
        spec: SOL003,
        seed: r#"{"extVirtualLinks": [], "extManagedVirtualLinks": [], "vimConnectionInfo": [], "additionalParams": {}}"#,
        copy_fields: &[
            FieldCopy::named("flavourId"),
            FieldCopy::named("instantiationLevelId"),
            FieldCopy::named("localizationLanguage"),
        ],
        collect_prefixes: INSTANTIATE_PREFIXES,
    },
    RequestTemplate {
        name: "ScaleVnfRequest",
        spec: SOL003,
        seed: r#"{"additionalParams": {}}"#,
        copy_fields: &[
            FieldCopy::renamed("scaleType", "type"),
            FieldCopy::renamed("scaleAspectId", "aspectId"),
            FieldCopy::named("numberOfSteps"),
            FieldCopy::named("node_type"),
        ],
        collect_prefixes: PARAMS_ONLY,
    },
    RequestTemplate {
        name: "CreateNsRequest",
        spec: SOL005,
        // The 3.3.1 create request has no additionalParams block of its own,
        // but every other request message features one, so it is accepted
        // here as well.
        seed: r#"{"additionalParams": {}}"#,
        copy_fields: &[
            FieldCopy::named("nsdId"),
            FieldCopy::named("nsName"),
            FieldCopy::named("nsDescription"),
        ],
        collect_prefixes: PARAMS_ONLY,
    },
    RequestTemplate {
        name: "InstantiateNsRequest",
        spec: SOL005,
        seed: r#"{"extVirtualLinks": [], "extManagedVirtualLinks": [], "vimConnectionInfo": [], "additionalParams": {}}"#,
        copy_fields: &[
            FieldCopy::named("nsFlavourId"),
            FieldCopy::named("nsInstantiationLevelId"),
        ],
        collect_prefixes: INSTANTIATE_PREFIXES,
    },
    RequestTemplate {
        name: "HealNsRequest",
        spec: SOL005,
        seed: r#"{"additionalParams": {}}"#,
        copy_fields: &[],
        collect_prefixes: PARAMS_ONLY,
    },
    RequestTemplate {
        name: "ScaleNsRequest",
        spec: SOL005,
        seed: r#"{"scaleType": "SCALE_NS", "additionalParams": {}}"#,
        copy_fields: &[],
        collect_prefixes: PARAMS_ONLY,
    },
    RequestTemplate {
        name: "TerminateNsRequest",
        spec: SOL005,
        // Termination time 0: terminate immediately (SOL005 3.3.1,
        // table 6.5.2.15-1).
        seed: r#"{"terminationTime": 0, "additionalParams": {}}"#,
        copy_fields: &[],
        collect_prefixes: PARAMS_ONLY,
    },
    RequestTemplate {
        name: "UpdateNsRequest-Start",
        spec: SOL005,
        seed: r#"{"updateType": "OPERATE_VNF", "operateVnfData": {"changeStateTo": "STARTED"}, "additionalParams": {}}"#,
        copy_fields: &[],
        collect_prefixes: PARAMS_ONLY,
    },
];

pub const RESPONSE_TEMPLATES: &[ResponseTemplate] = &[
    ResponseTemplate {
        name: "VnfInstance",
        spec: SOL003,
        id_output: "vnfInstanceId",
    },
    ResponseTemplate {
        name: "NsInstance",
        spec: SOL005,
        id_output: "nsInstanceId",
    },
];

pub fn request_template(name: &str) -> Result<&'static RequestTemplate, Error> {
    REQUEST_TEMPLATES
        .iter()
        .find(|template| template.name == name)
        .ok_or_else(|| unknown_template(name, REQUEST_TEMPLATES.iter().map(|t| t.name)))
}

pub fn response_template(name: &str) -> Result<&'static ResponseTemplate, Error> {
    RESPONSE_TEMPLATES
        .iter()
        .find(|template| template.name == name)
        .ok_or_else(|| unknown_template(name, RESPONSE_TEMPLATES.iter().map(|t| t.name)))
}

fn unknown_template(name: &str, known: impl Iterator<Item = &'static str>) -> Error {
    let names: Vec<&str> = known.collect();
    Error::new(ErrorKind::NotFound)
        .with_message(format!("unknown template: {name}"))
        .with_hint(format!("Known templates: {}.", names.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::{REQUEST_TEMPLATES, RESPONSE_TEMPLATES, request_template, response_template};
    use crate::core::error::ErrorKind;
    use serde_json::Value;

    #[test]
    fn every_seed_is_a_json_object() {
        for template in REQUEST_TEMPLATES {
            let seed: Value =
                serde_json::from_str(template.seed).unwrap_or_else(|err| {
                    panic!("seed for {} does not parse: {err}", template.name)
                });
            assert!(seed.is_object(), "seed for {} is not an object", template.name);
        }
    }

    #[test]
    fn template_names_are_unique() {
        let mut names: Vec<&str> = REQUEST_TEMPLATES.iter().map(|t| t.name).collect();
        names.extend(RESPONSE_TEMPLATES.iter().map(|t| t.name));
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn lookup_finds_known_and_rejects_unknown() {
        assert_eq!(
            request_template("InstantiateVnfRequest").unwrap().name,
            "InstantiateVnfRequest"
        );
        assert_eq!(response_template("NsInstance").unwrap().id_output, "nsInstanceId");

        let err = request_template("NoSuchRequest").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.hint().is_some_and(|hint| hint.contains("InstantiateVnfRequest")));
    }

    #[test]
    fn collect_prefixes_end_with_a_dot() {
        for template in REQUEST_TEMPLATES {
            for prefix in template.collect_prefixes {
                assert!(prefix.ends_with('.'), "{}: prefix {prefix:?}", template.name);
            }
        }
    }
}
