//! Reference Model Equivalence
//!
//! Random operation sequences applied to `MemoryRepository` and to the
//! sequential `ReferenceModel` must agree on every outcome and every read.

use crate::common::*;
use proptest::collection::vec;
use proptest::prelude::*;

const NAMES: &[&str] = &["Quirin", "Stefan", "Sebi", "Malte", "Joan", "Tim"];

fn employee() -> impl Strategy<Value = Employee> {
    (0..NAMES.len(), 18u32..30).prop_map(|(i, age)| Employee::new(NAMES[i], age))
}

fn operation() -> impl Strategy<Value = Operation<Employee>> {
    prop_oneof![
        4 => employee().prop_map(Operation::Create),
        2 => vec(employee(), 0..4).prop_map(Operation::CreateMany),
        3 => employee().prop_map(Operation::Update),
        3 => employee().prop_map(Operation::Delete),
        2 => vec(employee(), 0..4).prop_map(Operation::DeleteMany),
        1 => Just(Operation::DeleteAll),
    ]
}

fn apply(repo: &MemoryRepository<Employee>, op: Operation<Employee>) -> Result<(), RepositoryError> {
    match op {
        Operation::Create(e) => repo.create(e).map(|_| ()),
        Operation::CreateMany(es) => repo.create_many(es).map(|_| ()),
        Operation::Update(e) => repo.update(e).map(|_| ()),
        Operation::Delete(e) => repo.delete(&e),
        Operation::DeleteMany(es) => repo.delete_many(&es),
        Operation::DeleteAll => repo.delete_all(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn memory_repository_matches_model(ops in vec(operation(), 0..40)) {
        let repo = employee_repo();
        let mut model = ReferenceModel::new(Repository::namespace(&repo).clone());

        for op in ops {
            let expected = model.apply(op.clone());
            let actual = apply(&repo, op.clone());
            prop_assert_eq!(&expected, &actual, "diverged on {:?}", op);
            prop_assert_eq!(model.get_all(), repo.get_all());
        }
        prop_assert_eq!(model.len(), repo.count());
    }

    #[test]
    fn reads_match_model(
        people in vec(employee(), 0..12),
        bound in 18u32..30,
        descending in any::<bool>(),
        limit in proptest::option::of(0usize..6),
    ) {
        let repo = employee_repo();
        let mut model = ReferenceModel::new(Repository::namespace(&repo).clone());
        repo.create_many(people.clone()).unwrap();
        model.create_many(people).unwrap();

        let key = SortKey::ascending(|e: &Employee| e.age);
        let key = if descending { key.reversed() } else { key };
        let mut request = ReadRequest::all()
            .filtered_by(Query::le(|e: &Employee| e.age, bound))
            .sorted_by(key)
            .distinct_by(DistinctKey::new(|e: &Employee| e.age / 3));
        if let Some(n) = limit {
            request = request.limit(n);
        }

        let out = repo.get_elements(&request);
        prop_assert_eq!(&model.get_elements(&request), &out);

        prop_assert!(out.iter().all(|e| e.age <= bound));
        assert_unique_ids(&out);
        for pair in out.windows(2) {
            if descending {
                prop_assert!(pair[0].age >= pair[1].age);
            } else {
                prop_assert!(pair[0].age <= pair[1].age);
            }
            prop_assert_ne!(pair[0].age / 3, pair[1].age / 3);
        }
    }
}
