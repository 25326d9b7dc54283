use tracing::info;

use crate::error::MedisnipError;
use crate::medicover::Directory;
use crate::models::directory::DoctorLocator;
use crate::models::selector::DoctorSelector;

/// Walks Region -> Specialty -> Clinic -> Doctor and returns every doctor
/// locator the account can book, logging each as it is found.
pub async fn list_codes<D>(directory: &D) -> Result<Vec<DoctorLocator>, MedisnipError>
where
    D: Directory + ?Sized,
{
    info!("Listing available ids!");
    let mut locators = Vec::new();

    for region in directory.regions().await.map_err(MedisnipError::Query)? {
        let specialties = directory
            .specialties(region.region_id)
            .await
            .map_err(MedisnipError::Query)?;

        for specialty in specialties {
            let clinics = directory
                .clinics(region.region_id, specialty.specialty_id)
                .await
                .map_err(MedisnipError::Query)?;

            for clinic in clinics {
                let doctors = directory
                    .doctors(region.region_id, specialty.specialty_id, clinic.clinic_id)
                    .await
                    .map_err(MedisnipError::Query)?;

                for doctor in doctors {
                    let locator = DoctorLocator {
                        selector: DoctorSelector {
                            region_id: region.region_id,
                            specialty_id: specialty.specialty_id,
                            clinic_id: clinic.clinic_id,
                            doctor_id: doctor.doctor_id,
                        },
                        region_name: region.region_public_name.clone(),
                        clinic_name: clinic.clinic_public_name.clone(),
                        specialty_name: specialty.specialty_name.clone(),
                        doctor_name: doctor.doctor_name,
                    };

                    info!(
                        "DoctorLocatorID: {} for: Location: {} {} Specialty: {} Doctor: {}",
                        locator.selector,
                        locator.region_name,
                        locator.clinic_name,
                        locator.specialty_name,
                        locator.doctor_name
                    );
                    locators.push(locator);
                }
            }
        }
    }

    Ok(locators)
}
