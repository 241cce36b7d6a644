//! Fixed initial directory content, written once into an empty collection.

use crate::person::{NewPerson, PersonType};

const KEY_REPRESENTATIONS: &str = "Key Representations";

/// The seed set: two leadership entries with biography and cases, then four
/// associates with name, role and type only.
pub fn initial_people() -> Vec<NewPerson> {
    let mut people = initial_leadership();
    people.extend(initial_associates());
    people
}

fn initial_leadership() -> Vec<NewPerson> {
    vec![
        NewPerson {
            name: "Satish Talekar".to_string(),
            role: "Managing Partner".to_string(),
            kind: PersonType::Leadership,
            content: Some(vec![
                "Satish Talekar is a distinguished constitutional expert, renowned for his transformative impact on law and a legacy of landmark judgments. As the driving force behind Talekar & Associates, he has cultivated a firm that not only practices law but actively shapes it, fostering an environment of fierce independence and intellectual rigor.".to_string(),
            ]),
            landmark_cases_title: Some(KEY_REPRESENTATIONS.to_string()),
            landmark_cases: Some(vec![
                "Secured a landmark ruling in the Maratha Reservation case, setting a new precedent in affirmative action jurisprudence.".to_string(),
                "Successfully challenged state-wide regulations on educational admissions, ensuring equitable access for all students.".to_string(),
                "Represented a major public sector undertaking in a high-stakes arbitration concerning infrastructure development.".to_string(),
            ]),
        },
        NewPerson {
            name: "Pradnya Talekar".to_string(),
            role: "Partner".to_string(),
            kind: PersonType::Leadership,
            content: Some(vec![
                "Pradnya Talekar combines deep legal acumen with a client-centric approach, specializing in commercial litigation and regulatory compliance. Her strategic counsel is sought after by corporations and institutions navigating complex legal landscapes. She plays a pivotal role in mentoring the firm's associates and upholding its commitment to excellence.".to_string(),
            ]),
            landmark_cases_title: Some(KEY_REPRESENTATIONS.to_string()),
            landmark_cases: Some(vec![
                "Advised a leading financial institution on compliance with the new Digital Personal Data Protection Act.".to_string(),
                "Acted as lead counsel in a complex cross-border commercial dispute, resulting in a favorable settlement for the client.".to_string(),
                "Successfully defended a corporate client in a significant white-collar crime investigation.".to_string(),
            ]),
        },
    ]
}

fn initial_associates() -> Vec<NewPerson> {
    [
        "Madhuri A. Bhadke",
        "Tejas D. Dande",
        "Abhishek A. Deshpande",
        "Vrushali U. Maindad",
    ]
    .into_iter()
    .map(|name| NewPerson::basic(name, "Associate", PersonType::Associate))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_two_leaders_and_four_associates() {
        let people = initial_people();
        assert_eq!(people.len(), 6);

        let leaders: Vec<_> = people.iter().filter(|p| p.kind == PersonType::Leadership).collect();
        assert_eq!(leaders.len(), 2);
        for leader in leaders {
            assert_eq!(leader.content.as_ref().map(Vec::len), Some(1));
            assert_eq!(leader.landmark_cases_title.as_deref(), Some("Key Representations"));
            assert_eq!(leader.landmark_cases.as_ref().map(Vec::len), Some(3));
        }
    }

    #[test]
    fn associates_carry_only_required_fields() {
        for p in initial_people().iter().filter(|p| p.kind == PersonType::Associate) {
            assert_eq!(p.role, "Associate");
            assert!(p.content.is_none());
            assert!(p.landmark_cases_title.is_none());
            assert!(p.landmark_cases.is_none());
        }
    }
}
