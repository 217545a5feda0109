use crate::{
    cli::actions::{print_json, Context, PetDetails, PetsAction},
    clinic::{pets, Pet, UserRef},
    forms::PetForm,
    session::Access,
};
use anyhow::Result;

fn pet_for(details: &PetDetails, user_id: i64) -> Result<Pet> {
    PetForm {
        name: &details.name,
        species: &details.species,
        breed: &details.breed,
        date_of_birth: &details.date_of_birth,
        status: &details.status,
    }
    .validate()?;

    Ok(Pet {
        name: details.name.trim().to_string(),
        species: details.species.trim().to_string(),
        breed: details.breed.trim().to_string(),
        date_of_birth: Some(details.date_of_birth.trim().to_string()),
        status: details.status.trim().to_string(),
        user: Some(UserRef { user_id }),
        ..Pet::default()
    })
}

/// # Errors
/// Returns an error if the user is not logged in, the form is invalid or the
/// API call fails.
pub async fn handle(context: &Context, action: PetsAction) -> Result<()> {
    let identity = context.require(Access::Authenticated)?;

    match action {
        PetsAction::List { mine: true } => {
            print_json(&pets::list_pets_for_user(context.api(), identity.user_id).await?)
        }
        PetsAction::List { mine: false } => print_json(&pets::list_pets(context.api()).await?),
        PetsAction::Show { pet_id } => print_json(&pets::get_pet(context.api(), pet_id).await?),
        PetsAction::Add(details) => {
            let pet = pet_for(&details, identity.user_id)?;
            print_json(&pets::add_pet(context.api(), &pet).await?)
        }
        PetsAction::Update { pet_id, details } => {
            let pet = Pet {
                pet_id: Some(pet_id),
                ..pet_for(&details, identity.user_id)?
            };
            print_json(&pets::update_pet(context.api(), pet_id, &pet).await?)
        }
        PetsAction::Delete { pet_id } => {
            pets::delete_pet(context.api(), pet_id).await?;
            println!("Pet {pet_id} deleted");
            Ok(())
        }
    }
}
