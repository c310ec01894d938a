use std::sync::Arc;
use std::time::Duration;

use clinic_console::controllers::{bills, doctors, patients};
use clinic_console::{
    Action, Cell, ClinicConsole, Document, FormEvent, MemoryDocument, NotificationKind, RowAction,
    Section, TableRow, BUSY_ELEMENT,
};
use config_engine::ConsoleConfig;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn console_for(url: &str) -> (ClinicConsole, Arc<MemoryDocument>) {
    let doc = Arc::new(MemoryDocument::new());
    let config = ConsoleConfig {
        api_base_url: url.to_string(),
        request_timeout_secs: 5,
        ..Default::default()
    };
    let console = ClinicConsole::new(&config, doc.clone()).unwrap();
    (console, doc)
}

async fn json_mock(
    server: &mut ServerGuard,
    method: &str,
    path: &str,
    body: serde_json::Value,
) -> mockito::Mock {
    server
        .mock(method, path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

fn doctor_json(id: i64, name: &str, available: bool) -> serde_json::Value {
    json!({"id": id, "name": name, "specialization": "Cardiology", "available": available})
}

fn last_toast(doc: &MemoryDocument) -> (String, NotificationKind) {
    let toast = doc.toasts().pop().unwrap();
    (toast.message, toast.kind)
}

#[tokio::test]
async fn test_empty_list_renders_guidance_row() {
    let mut server = Server::new_async().await;
    json_mock(&mut server, "GET", "/patients", json!([])).await;

    let (console, doc) = console_for(&server.url());
    console.patients.load().await;

    assert_eq!(
        doc.rows("patients-tbody"),
        vec![TableRow::placeholder(
            "No patients found. Add a patient to get started.",
            5
        )]
    );
    assert!(doc.toasts().is_empty());
}

#[tokio::test]
async fn test_failed_load_renders_error_row_and_notifies() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/appointments")
        .with_status(500)
        .with_body("Database unavailable")
        .create_async()
        .await;

    let (console, doc) = console_for(&server.url());
    console.appointments.load().await;

    assert_eq!(
        doc.rows("appointments-tbody"),
        vec![TableRow::placeholder("Error loading appointments", 5)]
    );
    assert_eq!(
        last_toast(&doc),
        ("Database unavailable".to_string(), NotificationKind::Error)
    );
    assert_eq!(doc.visibility_changes(BUSY_ELEMENT), vec![false, true]);
}

#[tokio::test]
async fn test_network_failure_row_and_toast_dismissed() {
    let (console, doc) = console_for("http://127.0.0.1:1");
    console.doctors.load().await;

    assert_eq!(
        doc.rows("doctors-tbody"),
        vec![TableRow::placeholder("Error loading doctors", 5)]
    );
    assert!(!console.busy().is_shown());
    assert_eq!(doc.visibility_changes(BUSY_ELEMENT), vec![false, true]);
    let toast = doc.toast().unwrap();
    assert_eq!(toast.kind, NotificationKind::Error);
    assert!(!toast.message.is_empty());

    tokio::time::pause();
    tokio::time::sleep(Duration::from_millis(3001)).await;
    assert!(doc.toast().is_none());
}

#[tokio::test]
async fn test_add_doctor_then_list_gains_row() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/doctors")
        .match_body(Matcher::Json(json!({
            "name": "Dr. A",
            "specialization": "Cardiology",
            "available": true
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(doctor_json(1, "Dr. A", true).to_string())
        .create_async()
        .await;
    let list = json_mock(&mut server, "GET", "/doctors", json!([doctor_json(1, "Dr. A", true)])).await;

    let (console, doc) = console_for(&server.url());
    console.doctors.show_add_form();
    doc.set_value(doctors::NAME_FIELD, "Dr. A");
    doc.set_value(doctors::SPECIALIZATION_FIELD, "Cardiology");
    doc.set_checked(doctors::AVAILABLE_FIELD, true);

    let mut event = FormEvent::submit();
    console.doctors.add(&mut event).await.unwrap();

    create.assert_async().await;
    list.assert_async().await;
    assert!(event.default_prevented());
    assert_eq!(
        last_toast(&doc),
        ("Doctor added successfully!".to_string(), NotificationKind::Success)
    );
    assert!(doc.is_hidden("add-doctor-form"));
    assert_eq!(doc.value(doctors::NAME_FIELD), "");

    let rows = doc.rows("doctors-tbody");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].texts()[1], "Dr. A");
}

#[tokio::test]
async fn test_failed_add_keeps_form_open() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/doctors")
        .with_status(400)
        .with_body("Name already registered")
        .create_async()
        .await;
    let list = server.mock("GET", "/doctors").expect(0).create_async().await;

    let (console, doc) = console_for(&server.url());
    console.doctors.show_add_form();
    doc.set_value(doctors::NAME_FIELD, "Dr. A");
    doc.set_value(doctors::SPECIALIZATION_FIELD, "Cardiology");

    let result = console.doctors.add(&mut FormEvent::submit()).await;

    assert_eq!(result.unwrap_err().status(), Some(400));
    list.assert_async().await;
    assert!(!doc.is_hidden("add-doctor-form"));
    assert_eq!(doc.value(doctors::NAME_FIELD), "Dr. A");
}

#[tokio::test]
async fn test_non_numeric_age_makes_no_request() {
    let mut server = Server::new_async().await;
    let create = server.mock("POST", "/patients").expect(0).create_async().await;

    let (console, doc) = console_for(&server.url());
    doc.set_value(patients::NAME_FIELD, "Jane Roe");
    doc.set_value(patients::AGE_FIELD, "thirty");
    doc.set_value(patients::GENDER_FIELD, "Female");

    let err = console
        .patients
        .add(&mut FormEvent::submit())
        .await
        .unwrap_err();

    assert!(err.is_validation());
    create.assert_async().await;
    assert_eq!(last_toast(&doc), ("Age must be a whole number".to_string(), NotificationKind::Error));
    assert!(doc.visibility_changes(BUSY_ELEMENT).is_empty());
}

#[tokio::test]
async fn test_update_patient_puts_to_id_endpoint() {
    let mut server = Server::new_async().await;
    json_mock(
        &mut server,
        "GET",
        "/patients/7",
        json!({"id": 7, "name": "Jane Roe", "age": 34, "gender": "Female"}),
    )
    .await;
    let update = server
        .mock("PUT", "/patients/7")
        .match_body(Matcher::Json(json!({"name": "Jane Roe", "age": 35, "gender": "Female"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 7, "name": "Jane Roe", "age": 35, "gender": "Female"}).to_string())
        .create_async()
        .await;
    json_mock(
        &mut server,
        "GET",
        "/patients",
        json!([{"id": 7, "name": "Jane Roe", "age": 35, "gender": "Female"}]),
    )
    .await;

    let (console, doc) = console_for(&server.url());
    console.patients.show_edit_form(7).await.unwrap();
    assert_eq!(doc.value(patients::UPDATE_AGE_FIELD), "34");
    assert_eq!(doc.scrolled(), vec!["update-patient-form".to_string()]);

    doc.set_value(patients::UPDATE_AGE_FIELD, "35");
    console
        .patients
        .update(&mut FormEvent::submit())
        .await
        .unwrap();

    update.assert_async().await;
    assert!(doc.is_hidden("update-patient-form"));
    assert_eq!(doc.rows("patients-tbody")[0].texts()[2], "35");
    assert_eq!(
        last_toast(&doc),
        ("Patient updated successfully!".to_string(), NotificationKind::Success)
    );
}

#[tokio::test]
async fn test_add_and_edit_forms_are_exclusive() {
    let mut server = Server::new_async().await;
    json_mock(&mut server, "GET", "/doctors/4", doctor_json(4, "Dr. D", false)).await;

    let (console, doc) = console_for(&server.url());
    console.doctors.show_add_form();
    assert!(!doc.is_hidden("add-doctor-form"));

    console.doctors.show_edit_form(4).await.unwrap();
    assert!(!doc.is_hidden("update-doctor-form"));
    assert!(doc.is_hidden("add-doctor-form"));
    assert!(!doc.is_checked(doctors::UPDATE_AVAILABLE_FIELD));

    console.doctors.show_add_form();
    assert!(doc.is_hidden("update-doctor-form"));
    assert!(!doc.is_hidden("add-doctor-form"));
}

#[tokio::test]
async fn test_declined_delete_makes_no_request_and_no_change() {
    let mut server = Server::new_async().await;
    let delete = server.mock("DELETE", "/doctors/4").expect(0).create_async().await;
    let list = server.mock("GET", "/doctors").expect(0).create_async().await;

    let (console, doc) = console_for(&server.url());
    doc.set_confirm_answer(false);
    let before = doc.revision();

    console.doctors.delete(4).await.unwrap();

    delete.assert_async().await;
    list.assert_async().await;
    assert_eq!(doc.revision(), before);
    assert_eq!(
        doc.prompts(),
        vec!["Are you sure you want to delete this doctor?".to_string()]
    );
}

#[tokio::test]
async fn test_confirmed_cancel_reloads_appointments() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/appointments/2")
        .with_status(204)
        .create_async()
        .await;
    json_mock(&mut server, "GET", "/appointments", json!([])).await;

    let (console, doc) = console_for(&server.url());
    console.appointments.delete(2).await.unwrap();

    delete.assert_async().await;
    assert_eq!(
        last_toast(&doc),
        ("Appointment cancelled successfully!".to_string(), NotificationKind::Success)
    );
    assert_eq!(doc.render_count("appointments-tbody"), 1);
}

#[tokio::test]
async fn test_booking_form_offers_only_available_doctors() {
    let mut server = Server::new_async().await;
    json_mock(
        &mut server,
        "GET",
        "/patients",
        json!([{"id": 7, "name": "Jane Roe", "age": 34, "gender": "Female"}]),
    )
    .await;
    json_mock(
        &mut server,
        "GET",
        "/doctors",
        json!([doctor_json(1, "Dr. A", true), doctor_json(2, "Dr. B", false)]),
    )
    .await;

    let (console, doc) = console_for(&server.url());
    console.appointments.show_add_form().await.unwrap();

    assert!(!doc.is_hidden("add-appointment-form"));
    let doctor_values: Vec<String> = doc
        .options("appointment-doctor")
        .into_iter()
        .map(|o| o.value)
        .collect();
    assert_eq!(doctor_values, vec!["".to_string(), "1".to_string()]);
    assert_eq!(doc.options("appointment-patient")[1].label, "Jane Roe (ID: 7)");
}

#[tokio::test]
async fn test_book_appointment() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/appointments")
        .match_body(Matcher::Json(
            json!({"patientId": 7, "doctorId": 1, "appointmentDate": "2099-01-15"}),
        ))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": 3, "patientId": 7, "doctorId": 1, "appointmentDate": "2099-01-15"})
                .to_string(),
        )
        .create_async()
        .await;
    json_mock(
        &mut server,
        "GET",
        "/appointments",
        json!([{"id": 3, "patientId": 7, "doctorId": 1, "appointmentDate": "2099-01-15"}]),
    )
    .await;

    let (console, doc) = console_for(&server.url());
    doc.set_attribute("appointment-date", "min", "2026-01-01");
    doc.set_value("appointment-patient", "7");
    doc.set_value("appointment-doctor", "1");
    doc.set_value("appointment-date", "2099-01-15");

    console
        .appointments
        .add(&mut FormEvent::submit())
        .await
        .unwrap();

    create.assert_async().await;
    assert_eq!(
        last_toast(&doc).0,
        "Appointment booked successfully! Notification sent and bill created."
    );
    assert_eq!(
        doc.rows("appointments-tbody")[0].texts(),
        vec!["3", "7", "1", "2099-01-15", "Cancel"]
    );
    assert_eq!(doc.value("appointment-date"), "");
}

#[tokio::test]
async fn test_bill_search_empty_result() {
    let mut server = Server::new_async().await;
    json_mock(&mut server, "GET", "/bills/patient/7", json!([])).await;

    let (console, doc) = console_for(&server.url());
    doc.set_value(bills::SEARCH_FIELD, "7");
    console.bills.search_by_patient().await.unwrap();

    assert_eq!(
        doc.rows(bills::BILLS_TABLE),
        vec![TableRow::placeholder("No bills found for patient ID: 7", 6)]
    );
}

#[tokio::test]
async fn test_bill_search_echoes_entered_patient_id() {
    let mut server = Server::new_async().await;
    let search = json_mock(&mut server, "GET", "/bills/patient/7", json!([])).await;

    let (console, doc) = console_for(&server.url());
    doc.set_value(bills::SEARCH_FIELD, " 007 ");
    console.bills.search_by_patient().await.unwrap();

    search.assert_async().await;
    assert_eq!(
        doc.rows(bills::BILLS_TABLE),
        vec![TableRow::placeholder("No bills found for patient ID: 007", 6)]
    );
}

#[tokio::test]
async fn test_failed_bill_search_renders_error_row() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/bills/patient/7")
        .with_status(500)
        .with_body("Billing unavailable")
        .create_async()
        .await;

    let (console, doc) = console_for(&server.url());
    doc.set_value(bills::SEARCH_FIELD, "7");
    let err = console.bills.search_by_patient().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(
        doc.rows(bills::BILLS_TABLE),
        vec![TableRow::placeholder("Error loading bills", 6)]
    );
    assert_eq!(
        last_toast(&doc),
        ("Billing unavailable".to_string(), NotificationKind::Error)
    );
}

#[tokio::test]
async fn test_bill_search_requires_patient_id() {
    let (console, doc) = console_for("http://127.0.0.1:1");
    let err = console.bills.search_by_patient().await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(
        last_toast(&doc),
        ("Please enter a patient ID".to_string(), NotificationKind::Error)
    );
    assert!(doc.visibility_changes(BUSY_ELEMENT).is_empty());
    assert_eq!(doc.render_count(bills::BILLS_TABLE), 0);
}

#[tokio::test]
async fn test_pay_bill_reruns_current_search() {
    let mut server = Server::new_async().await;
    let pay = server
        .mock("PUT", "/bills/5/pay")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": 5, "appointmentId": 3, "patientId": 7, "amount": 500.0, "status": "PAID"})
                .to_string(),
        )
        .create_async()
        .await;
    let search = json_mock(
        &mut server,
        "GET",
        "/bills/patient/7",
        json!([{"id": 5, "appointmentId": 3, "patientId": 7, "amount": 500.0, "status": "PAID"}]),
    )
    .await;

    let (console, doc) = console_for(&server.url());
    doc.set_value(bills::SEARCH_FIELD, "7");
    console.bills.pay_bill(5).await.unwrap();

    pay.assert_async().await;
    search.assert_async().await;
    let TableRow::Cells(cells) = &doc.rows(bills::BILLS_TABLE)[0] else {
        panic!("expected a bill row");
    };
    assert_eq!(cells[3], Cell::Text("$500.00".to_string()));
    assert_eq!(cells[4].text(), "PAID");
    assert_eq!(
        cells[5],
        Cell::Actions(vec![
            RowAction::Note("✓ Paid"),
            RowAction::Button {
                label: "Delete",
                action: Action::Delete(5),
            },
        ])
    );
}

#[tokio::test]
async fn test_pay_bill_without_search_does_not_refresh() {
    let mut server = Server::new_async().await;
    server
        .mock("PUT", "/bills/5/pay")
        .with_status(200)
        .create_async()
        .await;
    let search = server
        .mock("GET", Matcher::Regex(r"^/bills/patient/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let (console, doc) = console_for(&server.url());
    console.bills.pay_bill(5).await.unwrap();

    search.assert_async().await;
    assert_eq!(
        last_toast(&doc),
        ("Bill marked as paid!".to_string(), NotificationKind::Success)
    );
    assert_eq!(doc.render_count(bills::BILLS_TABLE), 0);
}

#[tokio::test]
async fn test_confirmed_bill_delete_reruns_current_search() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/bills/5")
        .with_status(204)
        .create_async()
        .await;
    let search = json_mock(&mut server, "GET", "/bills/patient/7", json!([])).await;

    let (console, doc) = console_for(&server.url());
    doc.set_value(bills::SEARCH_FIELD, "7");
    console.bills.delete(5).await.unwrap();

    delete.assert_async().await;
    search.assert_async().await;
    assert_eq!(
        doc.prompts(),
        vec!["Are you sure you want to delete this bill?".to_string()]
    );
    assert_eq!(
        last_toast(&doc),
        ("Bill deleted successfully!".to_string(), NotificationKind::Success)
    );
    assert_eq!(
        doc.rows(bills::BILLS_TABLE),
        vec![TableRow::placeholder("No bills found for patient ID: 7", 6)]
    );
}

#[tokio::test]
async fn test_declined_bill_delete_makes_no_request_and_no_change() {
    let mut server = Server::new_async().await;
    let delete = server.mock("DELETE", "/bills/6").expect(0).create_async().await;
    let search = server
        .mock("GET", Matcher::Regex(r"^/bills/patient/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let (console, doc) = console_for(&server.url());
    doc.set_value(bills::SEARCH_FIELD, "7");
    doc.set_confirm_answer(false);
    let before = doc.revision();

    console.bills.delete(6).await.unwrap();

    delete.assert_async().await;
    search.assert_async().await;
    assert_eq!(doc.revision(), before);
    assert!(doc.toasts().is_empty());
}

#[tokio::test]
async fn test_add_bill_posts_query_and_searches_patient() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/bills")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("appointmentId".into(), "3".into()),
            Matcher::UrlEncoded("patientId".into(), "7".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": 5, "appointmentId": 3, "patientId": 7, "amount": 500.0, "status": "UNPAID"})
                .to_string(),
        )
        .create_async()
        .await;
    json_mock(
        &mut server,
        "GET",
        "/bills/patient/7",
        json!([{"id": 5, "appointmentId": 3, "patientId": 7, "amount": 500.0, "status": "UNPAID"}]),
    )
    .await;

    let (console, doc) = console_for(&server.url());
    console.bills.show_add_form();
    doc.set_value(bills::APPOINTMENT_FIELD, "3");
    doc.set_value(bills::PATIENT_FIELD, "7");

    console.bills.add(&mut FormEvent::submit()).await.unwrap();

    create.assert_async().await;
    assert!(doc.is_hidden(bills::ADD_FORM));
    assert_eq!(doc.value(bills::APPOINTMENT_FIELD), "");
    assert_eq!(doc.value(bills::SEARCH_FIELD), "7");
    assert_eq!(
        doc.rows(bills::BILLS_TABLE)[0].texts(),
        vec!["5", "3", "7", "$500.00", "UNPAID", "Mark as Paid Delete"]
    );
}

#[tokio::test]
async fn test_load_all_bills_is_local() {
    let (console, doc) = console_for("http://127.0.0.1:1");
    console.bills.load_all();

    assert_eq!(
        doc.rows(bills::BILLS_TABLE)[0].message(),
        Some("No bills to display. Create a bill or search by patient ID.")
    );
    assert_eq!(last_toast(&doc).1, NotificationKind::Info);
    assert!(doc.visibility_changes(BUSY_ELEMENT).is_empty());
}

#[tokio::test]
async fn test_dashboard_counts() {
    let mut server = Server::new_async().await;
    json_mock(
        &mut server,
        "GET",
        "/doctors",
        json!([doctor_json(1, "Dr. A", true), doctor_json(2, "Dr. B", false)]),
    )
    .await;
    json_mock(&mut server, "GET", "/patients", json!([])).await;
    json_mock(
        &mut server,
        "GET",
        "/appointments",
        json!([{"id": 3, "patientId": 7, "doctorId": 1, "appointmentDate": "2099-01-15"}]),
    )
    .await;

    let (console, doc) = console_for(&server.url());
    let summary = console.dashboard.refresh().await.unwrap();

    assert_eq!(summary.available_doctors, 1);
    assert_eq!(doc.text("total-doctors").as_deref(), Some("2"));
    assert_eq!(doc.text("total-patients").as_deref(), Some("0"));
    assert_eq!(doc.text("total-appointments").as_deref(), Some("1"));
    assert_eq!(doc.text("available-doctors").as_deref(), Some("1"));
    assert_eq!(
        last_toast(&doc),
        ("Dashboard refreshed!".to_string(), NotificationKind::Info)
    );
}

#[tokio::test]
async fn test_dashboard_failure_notifies() {
    let mut server = Server::new_async().await;
    json_mock(&mut server, "GET", "/doctors", json!([])).await;
    json_mock(&mut server, "GET", "/patients", json!([])).await;
    server
        .mock("GET", "/appointments")
        .with_status(503)
        .create_async()
        .await;

    let (console, doc) = console_for(&server.url());
    assert!(console.dashboard.refresh().await.is_err());

    assert_eq!(
        last_toast(&doc),
        ("Error loading dashboard data".to_string(), NotificationKind::Error)
    );
    assert!(doc.text("total-doctors").is_none());
}

#[tokio::test]
async fn test_navigation_to_billing_makes_no_request() {
    let (console, doc) = console_for("http://127.0.0.1:1");
    console.activate(Section::Doctors).await;
    console.activate(Section::Billing).await;

    assert!(doc.is_active("billing-section"));
    assert!(doc.is_active("nav-billing"));
    assert!(!doc.is_active("doctors-section"));
    assert!(!doc.is_active("nav-doctors"));
    // Only the doctors load went out
    assert_eq!(doc.visibility_changes(BUSY_ELEMENT), vec![false, true]);
    assert_eq!(doc.render_count(bills::BILLS_TABLE), 0);
}

#[tokio::test]
async fn test_navigation_loads_section() {
    let mut server = Server::new_async().await;
    let list = json_mock(&mut server, "GET", "/patients", json!([])).await;

    let (console, doc) = console_for(&server.url());
    console.activate(Section::Patients).await;

    list.assert_async().await;
    assert!(doc.is_active("patients-section"));
    assert_eq!(doc.render_count("patients-tbody"), 1);
}

#[tokio::test]
async fn test_initialize_sets_date_floor_and_loads() {
    let mut server = Server::new_async().await;
    json_mock(&mut server, "GET", "/doctors", json!([doctor_json(1, "Dr. A", true)])).await;
    json_mock(&mut server, "GET", "/patients", json!([])).await;
    json_mock(&mut server, "GET", "/appointments", json!([])).await;

    let (console, doc) = console_for(&server.url());
    console.initialize().await;

    let min = doc.attribute("appointment-date", "min").unwrap();
    assert!(chrono::NaiveDate::parse_from_str(&min, "%Y-%m-%d").is_ok());
    assert_eq!(doc.rows("doctors-tbody").len(), 1);
    assert_eq!(doc.text("available-doctors").as_deref(), Some("1"));
}
