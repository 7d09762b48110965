use super::common::*;

use crate::workflows::enrollment::domain::{ApprovalStatus, Seat, Track};
use crate::workflows::enrollment::lifecycle;
use crate::workflows::enrollment::repository::EnrollmentRegistry;
use crate::workflows::enrollment::Actor;

#[test]
fn add_section_appends_the_next_letter() {
    let (service, registry, _) = build_service_with_capacity(100);
    let registrar = Actor::system();

    let first = service
        .add_section(&registrar, Track::Ict)
        .expect("section adds");
    assert_eq!(first, "ICT11-A");

    for expected in ["ICT11-B", "ICT11-C", "ICT11-D"] {
        let label = service
            .add_section(&registrar, Track::Ict)
            .expect("section adds");
        assert_eq!(label, expected);
    }

    let sections = registry.sections_for(Track::Ict).expect("sections load");
    let total: u32 = sections.iter().map(|section| section.capacity).sum();
    assert_eq!(total, 100);
}

#[test]
fn shifting_moves_higher_occupants_down_one_slot() {
    // Scenario: A, B, C each hold occupants; collapsing B relocates C's
    // occupants onto B's id and label before the last row is dropped.
    let (_, registry, _) = build_service_with_capacity(12);
    for letter in 0..3 {
        registry
            .insert_section(Track::Ict, letter, 4)
            .expect("section inserts");
    }
    let sections = registry.sections_for(Track::Ict).expect("sections load");

    let ids = {
        let mut ids = Vec::new();
        for (index, section) in sections.iter().enumerate() {
            for offset in 0..2u64 {
                let applicant = registry
                    .insert_applicant(crate::workflows::enrollment::EnrollmentSubmission {
                        lrn: lrn_for(600 + index as u64 * 10 + offset),
                        last_name: format!("Occupant{index}{offset}"),
                        first_name: "Test".to_string(),
                        track: Track::Ict,
                        gender: if offset == 0 {
                            crate::workflows::enrollment::Gender::Male
                        } else {
                            crate::workflows::enrollment::Gender::Female
                        },
                    })
                    .expect("applicant inserts");
                registry
                    .update_status(applicant.id, ApprovalStatus::Approved, None)
                    .expect("status updates");
                registry
                    .update_seats(&[(applicant.id, Some(Seat::of(section)))])
                    .expect("seat writes");
                ids.push(applicant.id);
            }
        }
        ids
    };

    lifecycle::shift_occupants_down(&*registry, &sections, 1);

    // A untouched, B keeps its own occupants plus C's, C emptied.
    let in_a = registry.occupants_of(sections[0].id).expect("occupants");
    let in_b = registry.occupants_of(sections[1].id).expect("occupants");
    let in_c = registry.occupants_of(sections[2].id).expect("occupants");
    assert_eq!(in_a.len(), 2);
    assert_eq!(in_b.len(), 4);
    assert!(in_c.is_empty());

    for moved in &in_b {
        let seat = moved.seat.as_ref().expect("seat present");
        assert_eq!(seat.label, "ICT11-B");
    }

    // Headcount preserved across the shift.
    let seated: usize = ids
        .iter()
        .filter(|id| {
            registry
                .applicant(**id)
                .expect("applicant readable")
                .expect("applicant exists")
                .seat
                .is_some()
        })
        .count();
    assert_eq!(seated, 6);
}

#[test]
fn delete_collapses_letters_and_repacks() {
    let (service, registry, _) = build_service_with_capacity(12);
    let registrar = Actor::system();
    for _ in 0..3 {
        service
            .add_section(&registrar, Track::Ict)
            .expect("section adds");
    }

    let ids = register_pool(&service, Track::Ict, 6, 6, 700);
    service
        .bulk_set_status(&registrar, &ids, ApprovalStatus::Approved)
        .expect("bulk approval succeeds");
    service.synchronize().expect("synchronize succeeds");

    let sections = registry.sections_for(Track::Ict).expect("sections load");
    let target = sections[1].clone();
    service
        .delete_section(&registrar, target.id, Track::Ict)
        .expect("delete succeeds");

    let remaining = registry.sections_for(Track::Ict).expect("sections load");
    let labels: Vec<String> = remaining.iter().map(|section| section.name()).collect();
    assert_eq!(labels, vec!["ICT11-A", "ICT11-B"]);

    // Capacity re-derived over two sections; every applicant re-seated.
    let total: u32 = remaining.iter().map(|section| section.capacity).sum();
    assert_eq!(total, 12);
    for id in &ids {
        let applicant = registry
            .applicant(*id)
            .expect("applicant readable")
            .expect("applicant exists");
        assert!(applicant.seat.is_some());
    }
}

#[test]
fn deleting_the_only_section_unseats_its_occupants() {
    let (service, registry, _) = build_service_with_capacity(60);
    let registrar = Actor::system();
    service
        .add_section(&registrar, Track::Ict)
        .expect("section adds");

    let ids = register_pool(&service, Track::Ict, 1, 1, 750);
    service
        .bulk_set_status(&registrar, &ids, ApprovalStatus::Approved)
        .expect("bulk approval succeeds");

    let section = registry.sections_for(Track::Ict).expect("sections load")[0].clone();
    service
        .delete_section(&registrar, section.id, Track::Ict)
        .expect("delete succeeds");

    assert!(registry
        .sections_for(Track::Ict)
        .expect("sections load")
        .is_empty());
    for id in &ids {
        let applicant = registry
            .applicant(*id)
            .expect("applicant readable")
            .expect("applicant exists");
        assert!(applicant.seat.is_none());
        assert_eq!(applicant.section_label(), "Unassigned");
    }
}

#[test]
fn delete_unknown_section_reports_not_found() {
    let (service, _, _) = build_service_with_capacity(60);
    let err = service
        .delete_section(
            &Actor::system(),
            crate::workflows::enrollment::SectionId(999),
            Track::Gas,
        )
        .expect_err("missing section is an error");
    assert!(err.to_string().contains("not found"));
}

#[test]
fn add_fails_once_letters_run_out() {
    let (service, registry, _) = build_service_with_capacity(60);
    for letter in 0..26 {
        registry
            .insert_section(Track::Gas, letter, 0)
            .expect("section inserts");
    }

    let err = service
        .add_section(&Actor::system(), Track::Gas)
        .expect_err("27th section is rejected");
    assert!(err.to_string().contains("no section letters left"));
}
