use super::common::*;

use crate::workflows::volunteers::{
    validate, DraftField, FieldError, FieldErrorKind, Specialty, VolunteerApplicationDraft,
    MIN_AVAILABILITY_CHARS, MIN_EXPERIENCE_CHARS,
};

fn fields(errors: &[FieldError]) -> Vec<DraftField> {
    errors.iter().map(|error| error.field).collect()
}

fn draft_with_specialty(specialty: &str) -> VolunteerApplicationDraft {
    VolunteerApplicationDraft::new(specialty, VALID_AVAILABILITY, VALID_EXPERIENCE)
}

#[test]
fn valid_draft_has_no_errors() {
    assert!(validate(&valid_draft()).is_empty());
}

#[test]
fn every_enumerated_specialty_is_accepted() {
    for specialty in Specialty::ALL {
        let errors = validate(&draft_with_specialty(specialty.code()));
        assert!(errors.is_empty(), "{} should be accepted", specialty.code());
    }
}

#[test]
fn specialties_outside_the_set_are_required_errors() {
    for candidate in ["", " ", "informatica", "Informatics", " legal", "cooking"] {
        let errors = validate(&draft_with_specialty(candidate));
        assert_eq!(
            errors,
            vec![FieldError {
                field: DraftField::Specialty,
                kind: FieldErrorKind::Required,
            }],
            "specialty {candidate:?}"
        );
    }
}

#[test]
fn availability_threshold_counts_trimmed_characters() {
    let cases = [
        ("", true),
        ("123456789", true),
        ("   123456789   ", true),
        ("1234567890", false),
        ("  1234567890  ", false),
        ("manhãs sáb", false),
        ("manhãs sá", true),
    ];

    for (availability, too_short) in cases {
        let draft = VolunteerApplicationDraft::new("legal", availability, VALID_EXPERIENCE);
        let errors = validate(&draft);
        let expected = if too_short {
            vec![FieldError {
                field: DraftField::Availability,
                kind: FieldErrorKind::TooShort {
                    minimum: MIN_AVAILABILITY_CHARS,
                },
            }]
        } else {
            Vec::new()
        };
        assert_eq!(errors, expected, "availability {availability:?}");
    }
}

#[test]
fn experience_threshold_counts_trimmed_characters() {
    let nineteen = "a".repeat(19);
    let twenty = "a".repeat(20);
    let padded = format!("\n\t{nineteen} \n");

    for (experience, too_short) in [
        (nineteen.as_str(), true),
        (padded.as_str(), true),
        (twenty.as_str(), false),
        ("experiência em enfermagem", false),
    ] {
        let draft = VolunteerApplicationDraft::new("nursing", VALID_AVAILABILITY, experience);
        let has_error = validate(&draft)
            .iter()
            .any(|error| error.field == DraftField::Experience);
        assert_eq!(has_error, too_short, "experience {experience:?}");
    }

    let errors = validate(&VolunteerApplicationDraft::new(
        "nursing",
        VALID_AVAILABILITY,
        "short",
    ));
    assert_eq!(
        errors[0].kind,
        FieldErrorKind::TooShort {
            minimum: MIN_EXPERIENCE_CHARS
        }
    );
}

#[test]
fn empty_draft_reports_every_field_in_order() {
    let errors = validate(&VolunteerApplicationDraft::default());
    assert_eq!(
        fields(&errors),
        vec![
            DraftField::Specialty,
            DraftField::Availability,
            DraftField::Experience
        ]
    );
    assert_eq!(errors[0].kind, FieldErrorKind::Required);
    assert!(matches!(errors[1].kind, FieldErrorKind::TooShort { minimum: 10 }));
    assert!(matches!(errors[2].kind, FieldErrorKind::TooShort { minimum: 20 }));
}

#[test]
fn rules_are_independent() {
    let draft = VolunteerApplicationDraft::new("psychology", "soon", VALID_EXPERIENCE);
    assert_eq!(fields(&validate(&draft)), vec![DraftField::Availability]);

    let draft = VolunteerApplicationDraft::new("unknown", VALID_AVAILABILITY, "tiny");
    assert_eq!(
        fields(&validate(&draft)),
        vec![DraftField::Specialty, DraftField::Experience]
    );
}

#[test]
fn validation_is_deterministic_and_leaves_the_draft_alone() {
    let draft = VolunteerApplicationDraft::new("x", "y", "z");
    let before = draft.clone();
    assert_eq!(validate(&draft), validate(&draft));
    assert_eq!(draft, before);
}

#[test]
fn messages_follow_the_field() {
    let errors = validate(&VolunteerApplicationDraft::default());
    let messages: Vec<&str> = errors.iter().map(FieldError::message).collect();
    assert_eq!(
        messages,
        vec![
            "Selecione uma área de atuação",
            "Descreva sua disponibilidade com mais detalhes",
            "Conte-nos mais sobre sua experiência",
        ]
    );
}
