//! # Seed Dataset
//!
//! The registries the consoles demo against. Every store is populated at
//! startup with a fixed roster of districts, staff, applications,
//! licenses, and inspection visits, spread across states so that each
//! filter chip and dashboard tile has something to show. Twelve
//! applications at the default page size of six exercises the two-page
//! pager out of the box.

use lmd_core::{
    ApplicationKind, District, InspectionKind, LicenseCategory, Priority, Region, Role, Timestamp,
    UserRecord,
};
use lmd_state::{
    ApplicationRecord, GeoFix, InspectionRecord, LicenseRecord, TransitionEvidence,
};
use uuid::Uuid;

use crate::state::AppState;

fn ts(s: &str) -> Timestamp {
    Timestamp::parse(s).expect("seed timestamp is valid")
}

fn by(reason: &str, actor: &str) -> TransitionEvidence {
    TransitionEvidence::by(reason, actor)
}

/// Populate every registry store with the seed dataset.
pub fn populate(state: &AppState) {
    seed_districts(state);
    seed_users(state);
    seed_applications(state);
    seed_licenses(state);
    seed_inspections(state);

    tracing::debug!(
        applications = state.applications.len(),
        licenses = state.licenses.len(),
        inspections = state.inspections.len(),
        districts = state.districts.len(),
        users = state.users.len(),
        "seed dataset loaded"
    );
}

fn seed_districts(state: &AppState) {
    let districts = [
        ("MRP", "Meerpur", Region::North, "Meerpur City", 4, 37),
        ("RGH", "Raigarh", Region::East, "Raigarh", 3, 29),
        ("KLN", "Kolhan", Region::South, "Kolhan Junction", 5, 44),
        ("SPT", "Sonpat", Region::West, "Sonpat", 2, 18),
        ("CTL", "Central City", Region::Central, "Capital Complex", 6, 52),
        ("BLR", "Balarpur", Region::North, "Balarpur", 3, 21),
    ];
    for (code, name, region, headquarters, officers, active_licenses) in districts {
        state.districts.insert(
            code.to_string(),
            District {
                code: code.to_string(),
                name: name.to_string(),
                region,
                headquarters: headquarters.to_string(),
                officers,
                active_licenses,
            },
        );
    }
}

fn seed_users(state: &AppState) {
    let users = [
        ("a.khatri", "Anil Khatri", Role::Admin, None, true, Some("2025-07-30T08:14:00Z")),
        ("d.rao", "Devika Rao", Role::Officer, Some("MRP"), true, Some("2025-07-29T16:02:00Z")),
        ("s.menon", "Suhas Menon", Role::Officer, Some("KLN"), true, None),
        ("r.fernandes", "Rita Fernandes", Role::Inspector, Some("MRP"), true, Some("2025-07-28T09:41:00Z")),
        ("p.ghosh", "Priya Ghosh", Role::Inspector, Some("RGH"), true, None),
        ("n.verma", "Nikhil Verma", Role::Inspector, Some("SPT"), false, None),
    ];
    for (username, full_name, role, district, active, last_login) in users {
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            role,
            district: district.map(str::to_string),
            active,
            last_login: last_login.map(ts),
        };
        state.users.insert(record.id, record);
    }
}

fn seed_applications(state: &AppState) {
    use ApplicationKind::*;
    use LicenseCategory::*;
    use Priority::*;

    // (reference, applicant, kind, category, district, priority, fee, target state)
    let rows: [(&str, &str, ApplicationKind, LicenseCategory, &str, Priority, u32, &str); 12] = [
        ("LM-APP-2025-0001", "Precision Scales Ltd", NewLicense, Manufacturer, "MRP", High, 500, "approved"),
        ("LM-APP-2025-0002", "Raigarh Instruments", NewLicense, Dealer, "RGH", Medium, 100, "scrutiny"),
        ("LM-APP-2025-0003", "Kolhan Weigh Systems", Renewal, Manufacturer, "KLN", Low, 500, "submitted"),
        ("LM-APP-2025-0004", "City Scale Repairs", NewLicense, Repairer, "CTL", Medium, 100, "submitted"),
        ("LM-APP-2025-0005", "Sonpat Agro Packers", NewLicense, Packer, "SPT", Low, 50, "returned"),
        ("LM-APP-2025-0006", "Balarpur Traders", Renewal, Dealer, "BLR", Medium, 100, "submitted"),
        ("LM-APP-2025-0007", "Metro Instrument Imports", NewLicense, Importer, "CTL", High, 500, "scrutiny"),
        ("LM-APP-2025-0008", "Meerpur Weighbridge Co", Amendment, Manufacturer, "MRP", Urgent, 200, "approved"),
        ("LM-APP-2025-0009", "Kolhan Retail Scales", Duplicate, Dealer, "KLN", Low, 50, "rejected"),
        ("LM-APP-2025-0010", "Northline Repairs", Renewal, Repairer, "BLR", Medium, 100, "submitted"),
        ("LM-APP-2025-0011", "Sonpat Scale House", NewLicense, Dealer, "SPT", Medium, 100, "draft"),
        ("LM-APP-2025-0012", "Capital Calibration Works", NewLicense, Repairer, "CTL", High, 100, "draft"),
    ];

    for (reference, applicant, kind, category, district, priority, fee, target) in rows {
        let mut app = ApplicationRecord::new_draft(
            reference.to_string(),
            applicant.to_string(),
            kind,
            category,
            district.to_string(),
            priority,
            fee,
        );

        let advance = |app: &mut ApplicationRecord, to: &str| {
            match to {
                "draft" => {}
                "submitted" => {
                    app.submit(by("filed at district office", "d.rao"))
                        .expect("seed transition is valid");
                }
                "scrutiny" | "approved" | "rejected" | "returned" => {
                    app.submit(by("filed at district office", "d.rao"))
                        .expect("seed transition is valid");
                    app.begin_scrutiny(by("taken up for scrutiny", "d.rao"))
                        .expect("seed transition is valid");
                    match to {
                        "approved" => app
                            .approve(by("documents in order", "d.rao"))
                            .expect("seed transition is valid"),
                        "rejected" => app
                            .reject(by("original license not surrendered", "s.menon"))
                            .expect("seed transition is valid"),
                        "returned" => app
                            .return_for_revision(by("premises plan missing", "s.menon"))
                            .expect("seed transition is valid"),
                        _ => {}
                    }
                }
                other => unreachable!("unknown seed target state {other}"),
            };
        };
        advance(&mut app, target);
        state.applications.insert(app.id, app);
    }
}

fn seed_licenses(state: &AppState) {
    use LicenseCategory::*;

    // (number, holder, category, district, valid_until, instruments, target state)
    let rows: [(&str, &str, LicenseCategory, &str, &str, u32, &str); 9] = [
        ("LM-MFR-0423", "Precision Scales Ltd", Manufacturer, "MRP", "2026-03-31T23:59:59Z", 12, "active"),
        ("LM-DLR-0781", "Raigarh Instruments", Dealer, "RGH", "2026-03-31T23:59:59Z", 5, "active"),
        ("LM-RPR-0312", "City Scale Repairs", Repairer, "CTL", "2025-12-31T23:59:59Z", 3, "active"),
        ("LM-MFR-0390", "Kolhan Weigh Systems", Manufacturer, "KLN", "2026-03-31T23:59:59Z", 19, "active"),
        ("LM-PKR-0104", "Sonpat Agro Packers", Packer, "SPT", "2026-03-31T23:59:59Z", 2, "issued"),
        ("LM-DLR-0550", "Balarpur Traders", Dealer, "BLR", "2025-09-30T23:59:59Z", 4, "suspended"),
        ("LM-RPR-0228", "Northline Repairs", Repairer, "BLR", "2025-09-30T23:59:59Z", 2, "suspended"),
        ("LM-DLR-0497", "Kolhan Retail Scales", Dealer, "KLN", "2025-03-31T23:59:59Z", 6, "expired"),
        ("LM-IMP-0061", "Metro Instrument Imports", Importer, "CTL", "2026-03-31T23:59:59Z", 8, "revoked"),
    ];

    for (number, holder, category, district, valid_until, instruments, target) in rows {
        let mut lic = LicenseRecord::new_issued(
            number.to_string(),
            holder.to_string(),
            category,
            district.to_string(),
            ts(valid_until),
            instruments,
        );
        match target {
            "issued" => {}
            "active" => {
                lic.activate(by("fee realized", "d.rao"))
                    .expect("seed transition is valid");
            }
            "suspended" => {
                lic.activate(by("fee realized", "d.rao"))
                    .expect("seed transition is valid");
                lic.suspend(by("periodic verification overdue", "s.menon"))
                    .expect("seed transition is valid");
            }
            "expired" => {
                lic.activate(by("fee realized", "d.rao"))
                    .expect("seed transition is valid");
                lic.expire(by("validity period ended", "a.khatri"))
                    .expect("seed transition is valid");
            }
            "revoked" => {
                lic.activate(by("fee realized", "d.rao"))
                    .expect("seed transition is valid");
                lic.revoke(by("unstamped instruments in trade", "a.khatri"))
                    .expect("seed transition is valid");
            }
            other => unreachable!("unknown seed target state {other}"),
        }
        state.licenses.insert(lic.id, lic);
    }
}

fn seed_inspections(state: &AppState) {
    use InspectionKind::*;
    use Priority::*;

    // (reference, establishment, district, inspector, kind, priority, scheduled, target state)
    let rows: [(&str, &str, &str, &str, InspectionKind, Priority, &str, &str); 8] = [
        ("LM-INS-2025-0101", "Meerpur Weighbridge", "MRP", "r.fernandes", Verification, High, "2025-08-11T10:00:00Z", "scheduled"),
        ("LM-INS-2025-0102", "Raigarh Grain Market", "RGH", "p.ghosh", Stamping, Medium, "2025-08-12T09:30:00Z", "scheduled"),
        ("LM-INS-2025-0103", "Kolhan Retail Scales", "KLN", "r.fernandes", Surprise, Urgent, "2025-08-06T08:00:00Z", "in_progress"),
        ("LM-INS-2025-0104", "Sonpat Fuel Station", "SPT", "p.ghosh", Complaint, High, "2025-08-05T11:00:00Z", "in_progress_with_fix"),
        ("LM-INS-2025-0105", "Capital Jewellers Row", "CTL", "r.fernandes", Verification, Medium, "2025-07-22T10:00:00Z", "completed"),
        ("LM-INS-2025-0106", "Balarpur Timber Depot", "BLR", "p.ghosh", Stamping, Low, "2025-07-18T14:00:00Z", "completed"),
        ("LM-INS-2025-0107", "Meerpur Dairy Co-op", "MRP", "r.fernandes", Verification, Low, "2025-07-25T10:00:00Z", "cancelled"),
        ("LM-INS-2025-0108", "Central Goods Yard", "CTL", "p.ghosh", Surprise, Medium, "2025-08-14T07:30:00Z", "scheduled"),
    ];

    for (reference, establishment, district, inspector, kind, priority, scheduled, target) in rows {
        let mut visit = InspectionRecord::new_scheduled(
            reference.to_string(),
            establishment.to_string(),
            district.to_string(),
            inspector.to_string(),
            kind,
            priority,
            ts(scheduled),
        );
        match target {
            "scheduled" => {}
            "in_progress" => {
                visit
                    .start(by("arrived on site", inspector))
                    .expect("seed transition is valid");
            }
            "in_progress_with_fix" => {
                visit
                    .start(by("arrived on site", inspector))
                    .expect("seed transition is valid");
                let fix = GeoFix::new(28.6139, 77.2090, Some(9.5)).expect("seed fix is valid");
                visit
                    .record_location(fix)
                    .expect("seed location is accepted");
            }
            "completed" => {
                visit
                    .start(by("arrived on site", inspector))
                    .expect("seed transition is valid");
                visit
                    .complete(by("report filed", inspector))
                    .expect("seed transition is valid");
            }
            "cancelled" => {
                visit
                    .cancel(by("establishment closed for the season", inspector))
                    .expect("seed transition is valid");
            }
            other => unreachable!("unknown seed target state {other}"),
        }
        state.inspections.insert(visit.id, visit);
    }
}
