//! Role capability table.
//!
//! Every role-gated decision in the UI (navigation entries, buttons, modals,
//! form fields, form submissions) is answered here.

use crate::models::Role;

/// Pages of the admin shell, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Dashboard,
    Doctors,
    Appointments,
    Prescriptions,
    Billing,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Dashboard,
        Page::Doctors,
        Page::Appointments,
        Page::Prescriptions,
        Page::Billing,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Doctors => "doctors",
            Page::Appointments => "appointments",
            Page::Prescriptions => "prescriptions",
            Page::Billing => "billing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Doctors => "Doctors",
            Page::Appointments => "Appointments",
            Page::Prescriptions => "Prescriptions",
            Page::Billing => "Billing",
        }
    }

    /// Icon name in the `ui::icons` lookup.
    pub fn icon(self) -> &'static str {
        match self {
            Page::Dashboard => "home",
            Page::Doctors => "doctors",
            Page::Appointments => "appts",
            Page::Prescriptions => "rx",
            Page::Billing => "billing",
        }
    }

    pub fn from_id(id: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|page| page.id() == id)
    }
}

/// Role-gated actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    AddDoctor,
    BookAppointment,
    /// Choose the patient of a booking instead of booking for oneself
    AssignPatient,
    CompleteAppointment,
    CancelAppointment,
    WritePrescription,
    CreateInvoice,
    DownloadInvoice,
}

/// (role, action) grants. Anything not listed is denied.
const GRANTS: &[(&str, Action)] = &[
    ("admin", Action::AddDoctor),
    ("admin", Action::BookAppointment),
    ("admin", Action::AssignPatient),
    ("admin", Action::CreateInvoice),
    ("admin", Action::DownloadInvoice),
    ("doctor", Action::CompleteAppointment),
    ("doctor", Action::CancelAppointment),
    ("doctor", Action::WritePrescription),
    ("patient", Action::BookAppointment),
    ("patient", Action::DownloadInvoice),
];

/// Pages each role may navigate to.
const PAGES: &[(&str, &[Page])] = &[
    ("admin", &Page::ALL),
    (
        "doctor",
        &[
            Page::Dashboard,
            Page::Doctors,
            Page::Appointments,
            Page::Prescriptions,
        ],
    ),
    ("patient", &Page::ALL),
];

/// Whether `role` may perform `action`.
pub fn allows(role: &Role, action: Action) -> bool {
    GRANTS
        .iter()
        .any(|(granted, a)| *granted == role.as_str() && *a == action)
}

/// Navigation for `role`: the allow-list intersected with the page list, in page order.
pub fn nav_pages(role: &Role) -> Vec<Page> {
    let allowed = PAGES
        .iter()
        .find(|(name, _)| *name == role.as_str())
        .map(|(_, pages)| *pages)
        .unwrap_or(&[]);

    Page::ALL
        .into_iter()
        .filter(|page| allowed.contains(page))
        .collect()
}

/// Whether `role` may open `page`.
pub fn can_view(role: &Role, page: Page) -> bool {
    nav_pages(role).contains(&page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_per_role() {
        assert_eq!(nav_pages(&Role::Admin), Page::ALL.to_vec());
        assert_eq!(
            nav_pages(&Role::Doctor),
            vec![
                Page::Dashboard,
                Page::Doctors,
                Page::Appointments,
                Page::Prescriptions
            ]
        );
        assert_eq!(nav_pages(&Role::Patient), Page::ALL.to_vec());
        assert!(nav_pages(&Role::Unknown("nurse".to_string())).is_empty());
    }

    #[test]
    fn test_doctor_cannot_open_billing() {
        assert!(!can_view(&Role::Doctor, Page::Billing));
        assert!(can_view(&Role::Patient, Page::Billing));
    }

    #[test]
    fn test_action_grants() {
        assert!(allows(&Role::Admin, Action::AddDoctor));
        assert!(!allows(&Role::Doctor, Action::AddDoctor));
        assert!(!allows(&Role::Patient, Action::AddDoctor));

        assert!(allows(&Role::Admin, Action::BookAppointment));
        assert!(allows(&Role::Patient, Action::BookAppointment));
        assert!(!allows(&Role::Doctor, Action::BookAppointment));

        assert!(allows(&Role::Admin, Action::AssignPatient));
        assert!(!allows(&Role::Patient, Action::AssignPatient));

        for action in [
            Action::CompleteAppointment,
            Action::CancelAppointment,
            Action::WritePrescription,
        ] {
            assert!(allows(&Role::Doctor, action));
            assert!(!allows(&Role::Admin, action));
            assert!(!allows(&Role::Patient, action));
        }

        assert!(allows(&Role::Admin, Action::CreateInvoice));
        assert!(!allows(&Role::Patient, Action::CreateInvoice));
        assert!(allows(&Role::Patient, Action::DownloadInvoice));
        assert!(!allows(&Role::Doctor, Action::DownloadInvoice));
        assert!(!allows(&Role::Unknown("nurse".to_string()), Action::DownloadInvoice));
    }

    #[test]
    fn test_page_ids_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_id(page.id()), Some(page));
        }
        assert_eq!(Page::from_id("settings"), None);
    }
}
