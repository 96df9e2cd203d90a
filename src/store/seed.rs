//! Sample FAQs loaded into an empty database on first start.

use tracing::info;

use super::Store;
use crate::error::StoreError;
use crate::models::NewFaq;

const SAMPLE_FAQS: &[(&str, &str, &str)] = &[
    (
        "emergency_services",
        "What should I do if my child is missing?",
        "If your child is missing, immediately contact local authorities and UNICEF emergency services. Call the emergency hotline and provide a detailed description including last known location, clothing, and any distinguishing features.",
    ),
    (
        "emergency_services",
        "How can I report child abuse or neglect?",
        "Report child abuse or neglect immediately to local child protection authorities or UNICEF. Do not confront the abuser directly. Ensure the child's safety first, then contact emergency services or child protection hotlines.",
    ),
    (
        "emergency_services",
        "What are the emergency contact numbers in Gaza?",
        "Emergency contacts in Gaza include: Child Protection Emergency Line, UNICEF Hotline, and local police emergency services. Contact your local UNICEF office for current emergency numbers specific to your area.",
    ),
    (
        "legal_support",
        "How can I obtain documentation for my child?",
        "Contact local civil registration authorities or UNICEF support services. You may need birth certificates, family registration documents, or identity papers. UNICEF can assist with documentation processes and connecting you with appropriate legal services.",
    ),
    (
        "legal_support",
        "What legal rights do children have in conflict zones?",
        "Children in conflict zones have fundamental rights including protection from violence, access to education, healthcare, and family unity. International humanitarian law protects children, and UNICEF works to ensure these rights are upheld.",
    ),
    (
        "legal_support",
        "How can I seek asylum or refugee status for my family?",
        "Contact UNHCR or local refugee assistance organizations. You may need to file an asylum application, provide documentation, and attend interviews. UNICEF can provide referrals to legal assistance and refugee support services.",
    ),
    (
        "health_services",
        "Where can I find medical care for my child?",
        "UNICEF-supported health centers, local hospitals, and mobile health units provide medical care for children. Contact your local health authority or UNICEF office to find the nearest available medical facilities and services.",
    ),
    (
        "health_services",
        "How can I access mental health support for my child?",
        "UNICEF provides psychosocial support services through trained counselors and community programs. Contact local mental health services, school counselors, or UNICEF support lines for age-appropriate mental health assistance.",
    ),
    (
        "health_services",
        "What vaccinations are available for children?",
        "UNICEF supports vaccination campaigns for common childhood diseases. Contact local health centers or UNICEF mobile units for information about available vaccination schedules and locations.",
    ),
    (
        "education",
        "How can my child continue their education?",
        "UNICEF supports various education programs including formal schooling, informal education, and distance learning. Contact local schools, education authorities, or UNICEF education coordinators for enrollment and support options.",
    ),
    (
        "education",
        "Are there educational materials available for children?",
        "UNICEF provides educational materials, textbooks, and learning resources. Digital learning platforms and printed materials are available through schools, community centers, and UNICEF distribution points.",
    ),
    (
        "education",
        "How can I help my child with trauma and stress?",
        "UNICEF offers psychosocial support programs, child-friendly activities, and counseling services. Maintain routines, provide emotional support, and connect with community support groups. Seek professional help if needed.",
    ),
    (
        "family_services",
        "How can I find family members who are separated?",
        "Contact family tracing services through UNICEF or Red Cross organizations. Provide detailed information about missing family members including names, ages, last known locations, and contact information.",
    ),
    (
        "family_services",
        "What support is available for single parents?",
        "UNICEF provides support for single parents including financial assistance, childcare services, counseling, and connections to community resources. Contact local social services or UNICEF family support programs.",
    ),
    (
        "family_services",
        "How can I register for humanitarian assistance?",
        "Register for humanitarian assistance through local distribution points, UN agencies, or community organizations. Bring identification documents and provide information about your family's needs and current situation.",
    ),
    (
        "general_support",
        "How can I contact UNICEF for help?",
        "You can contact UNICEF through local offices, hotlines, community centers, or online platforms. UNICEF staff are available to provide assistance, information, and connections to essential services.",
    ),
    (
        "general_support",
        "What information should I keep ready for emergencies?",
        "Keep important documents like identification papers, medical records, family photos, emergency contact numbers, and essential supplies readily accessible. Also memorize key family information and safe meeting points.",
    ),
    (
        "general_support",
        "How can I help protect my child during conflict?",
        "Keep children away from danger zones, maintain family unity, follow safety instructions from authorities, and teach children about protective measures. Stay informed about security situations and evacuation procedures.",
    ),
];

pub fn sample_faqs() -> Vec<NewFaq> {
    SAMPLE_FAQS
        .iter()
        .map(|(category, question, answer)| NewFaq::new(*question, *answer, Some(*category), "en"))
        .collect()
}

/// Insert the sample FAQs when the table is empty. Returns how many were added.
pub async fn seed_if_empty(store: &dyn Store) -> Result<usize, StoreError> {
    if store.count_faqs().await? > 0 {
        return Ok(0);
    }
    info!("no FAQs found, inserting sample data");
    let faqs = sample_faqs();
    let count = faqs.len();
    for faq in faqs {
        store.insert_faq(faq).await?;
    }
    info!(count, "sample FAQs inserted");
    Ok(count)
}
