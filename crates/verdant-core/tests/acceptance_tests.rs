use chrono::Utc;
use verdant_core::{CoreError, RequestDraft};
use verdant_domain::{GardenStatus, PlantKind, RequestStatus};
use verdant_test_utils::{init_tracing, sample_start, World};

async fn waiting_request(
    world: &World,
    farm: verdant_domain::FarmId,
    client: verdant_domain::ClientId,
    herbs: Vec<verdant_domain::PlantId>,
    roots: Vec<verdant_domain::PlantId>,
) -> verdant_domain::ServiceRequest {
    let package = world.grow_package(farm).await;
    world
        .request_service
        .create_request(
            client,
            package.id,
            RequestDraft {
                time: Some(sample_start()),
                herb_list: herbs,
                root_list: roots,
                note: "balcony garden".into(),
                ..RequestDraft::default()
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn accept_provisions_projects_plans_and_garden() {
    init_tracing();
    let world = World::new();
    let farm = verdant_domain::FarmId::new();
    let client = verdant_domain::ClientId::new();

    let (basil, genovese) = world
        .grow_plant(farm, "Basil", PlantKind::Herb, "Genovese")
        .await;
    let template = world.grow_template(farm, basil, genovese).await;
    let request = waiting_request(&world, farm, client, vec![basil], vec![]).await;

    let outcome = world
        .acceptance
        .accept(request.id, farm, "north bed", None)
        .await
        .unwrap();

    assert_eq!(outcome.request.status, RequestStatus::Accepted);
    assert_eq!(outcome.garden.status, GardenStatus::Started);
    assert_eq!(outcome.garden.projects.len(), 1);
    assert_eq!(outcome.garden.client, client);
    assert_eq!(outcome.garden.request, request.id);

    let projects = world
        .garden_service
        .projects_of_garden(outcome.garden.id)
        .await
        .unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].plant, basil);
    assert_eq!(projects[0].seed, genovese);

    // The project owns a private copy, not the template itself.
    let attached = world
        .project_service
        .plan_of_project(projects[0].id)
        .await
        .unwrap()
        .expect("plan attached");
    assert_ne!(attached.id, template.id);
    assert!(!attached.is_default);
    assert_eq!(attached.contents, template.contents);
}

#[tokio::test]
async fn accept_orders_projects_by_plant_kind() {
    let world = World::new();
    let farm = verdant_domain::FarmId::new();
    let client = verdant_domain::ClientId::new();

    let (basil, genovese) = world
        .grow_plant(farm, "Basil", PlantKind::Herb, "Genovese")
        .await;
    let (carrot, nantes) = world
        .grow_plant(farm, "Carrot", PlantKind::Root, "Nantes")
        .await;
    world.grow_template(farm, basil, genovese).await;
    world.grow_template(farm, carrot, nantes).await;
    let request = waiting_request(&world, farm, client, vec![basil], vec![carrot]).await;

    let outcome = world
        .acceptance
        .accept(request.id, farm, "", None)
        .await
        .unwrap();
    let projects = world
        .garden_service
        .projects_of_garden(outcome.garden.id)
        .await
        .unwrap();

    // Herb list fans out before the root list.
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].plant, basil);
    assert_eq!(projects[1].plant, carrot);
}

#[tokio::test]
async fn accept_fails_when_a_listed_plant_is_gone() {
    let world = World::new();
    let farm = verdant_domain::FarmId::new();
    let client = verdant_domain::ClientId::new();

    let (basil, _) = world
        .grow_plant(farm, "Basil", PlantKind::Herb, "Genovese")
        .await;
    let request = waiting_request(&world, farm, client, vec![basil], vec![]).await;
    world.plant_catalog.delete_plant(basil, farm).await.unwrap();

    let err = world
        .acceptance
        .accept(request.id, farm, "", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));

    // Nothing was provisioned and the request is still actionable.
    assert!(world.project_service.projects_by_farm(farm).await.is_empty());
    let request = world
        .request_service
        .request_by_id(request.id)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Waiting);
}

#[tokio::test]
async fn accept_rolls_back_partial_provisioning() {
    init_tracing();
    let world = World::new();
    let farm = verdant_domain::FarmId::new();
    let client = verdant_domain::ClientId::new();

    let (basil, genovese) = world
        .grow_plant(farm, "Basil", PlantKind::Herb, "Genovese")
        .await;
    world.grow_template(farm, basil, genovese).await;

    // A live plant with no seed at all makes its provisioning step fail
    // after the basil project already landed.
    let seedless = world
        .plant_catalog
        .add_plant(
            farm,
            PlantKind::Root,
            verdant_catalog::NewPlant {
                name: "Carrot".into(),
                ..verdant_catalog::NewPlant::default()
            },
        )
        .await
        .unwrap();
    let request = waiting_request(&world, farm, client, vec![basil], vec![seedless.id]).await;

    let err = world
        .acceptance
        .accept(request.id, farm, "", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Catalog(_)), "got {err:?}");

    // The basil project and its plan copy were compensated away.
    assert!(world.project_service.projects_by_farm(farm).await.is_empty());
    assert_eq!(world.recipe_service.plans_by_seed(genovese).await.len(), 1);
    assert!(world.garden_service.gardens_by_farm(farm).await.is_empty());
    let request = world
        .request_service
        .request_by_id(request.id)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Waiting);
}

#[tokio::test]
async fn accept_is_one_shot() {
    let world = World::new();
    let farm = verdant_domain::FarmId::new();
    let client = verdant_domain::ClientId::new();

    let (basil, genovese) = world
        .grow_plant(farm, "Basil", PlantKind::Herb, "Genovese")
        .await;
    world.grow_template(farm, basil, genovese).await;
    let request = waiting_request(&world, farm, client, vec![basil], vec![]).await;

    world
        .acceptance
        .accept(request.id, farm, "", None)
        .await
        .unwrap();
    let err = world
        .acceptance
        .accept(request.id, farm, "", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Transition(_)));

    // The second attempt must not have grown a second garden.
    assert_eq!(world.garden_service.gardens_by_farm(farm).await.len(), 1);
}

#[tokio::test]
async fn rejected_requests_cannot_be_accepted() {
    let world = World::new();
    let farm = verdant_domain::FarmId::new();
    let client = verdant_domain::ClientId::new();

    let (basil, _) = world
        .grow_plant(farm, "Basil", PlantKind::Herb, "Genovese")
        .await;
    let request = waiting_request(&world, farm, client, vec![basil], vec![]).await;

    let rejected = world
        .request_service
        .reject(request.id, farm)
        .await
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);

    let err = world
        .acceptance
        .accept(request.id, farm, "", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Transition(_)));
}

#[tokio::test]
async fn accept_requires_request_ownership() {
    let world = World::new();
    let farm = verdant_domain::FarmId::new();
    let client = verdant_domain::ClientId::new();

    let (basil, _) = world
        .grow_plant(farm, "Basil", PlantKind::Herb, "Genovese")
        .await;
    let request = waiting_request(&world, farm, client, vec![basil], vec![]).await;

    let err = world
        .acceptance
        .accept(request.id, verdant_domain::FarmId::new(), "", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
}

#[tokio::test]
async fn accept_refuses_a_plant_without_a_plan_template() {
    let world = World::new();
    let farm = verdant_domain::FarmId::new();
    let client = verdant_domain::ClientId::new();

    let (basil, genovese) = world
        .grow_plant(farm, "Basil", PlantKind::Herb, "Genovese")
        .await;
    world.grow_template(farm, basil, genovese).await;
    // Seeded plant, but no plan template anywhere.
    let (mint, _) = world
        .grow_plant(farm, "Mint", PlantKind::Herb, "Spearmint")
        .await;
    let request = waiting_request(&world, farm, client, vec![basil, mint], vec![]).await;

    let err = world
        .acceptance
        .accept(request.id, farm, "", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Recipe(_)), "got {err:?}");

    // The basil project landed first and was compensated away; no garden,
    // and the request is still actionable.
    assert!(world.project_service.projects_by_farm(farm).await.is_empty());
    assert_eq!(world.recipe_service.plans_by_seed(genovese).await.len(), 1);
    assert!(world.garden_service.gardens_by_farm(farm).await.is_empty());
    let request = world
        .request_service
        .request_by_id(request.id)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Waiting);
}

#[tokio::test]
async fn accept_stamps_start_at_acceptance_time() {
    let world = World::new();
    let farm = verdant_domain::FarmId::new();
    let client = verdant_domain::ClientId::new();

    let (basil, genovese) = world
        .grow_plant(farm, "Basil", PlantKind::Herb, "Genovese")
        .await;
    world.grow_template(farm, basil, genovese).await;
    let request = waiting_request(&world, farm, client, vec![basil], vec![]).await;

    let before = Utc::now();
    let outcome = world
        .acceptance
        .accept(request.id, farm, "", None)
        .await
        .unwrap();

    // The proposed time on the request is a week out; the garden starts now.
    assert!(outcome.garden.start_date >= before);
    assert!(outcome.garden.start_date < request.time);
    let projects = world
        .garden_service
        .projects_of_garden(outcome.garden.id)
        .await
        .unwrap();
    assert_eq!(projects[0].start_date, Some(outcome.garden.start_date));
}
