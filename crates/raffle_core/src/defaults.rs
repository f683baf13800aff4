use shared::domain::{sort_by_name, Category, Employee};

const SEED: &[(&str, &str, Category)] = &[
    ("default-lead-01", "Alice Wonderland", Category::Leadership),
    ("default-lead-02", "Bob The Builder", Category::Leadership),
    ("default-lead-03", "Charlie Brown", Category::Leadership),
    ("default-lead-04", "Diana Prince", Category::Leadership),
    ("default-lead-05", "Edward Scissorhands", Category::Leadership),
    ("default-emp-01", "Fiona Gallagher", Category::Employee),
    ("default-emp-02", "George Jetson", Category::Employee),
    ("default-emp-03", "Hannah Montana", Category::Employee),
    ("default-emp-04", "Ian Malcolm", Category::Employee),
    ("default-emp-05", "Julia Child", Category::Employee),
    ("default-emp-06", "Katherine Hepburn", Category::Employee),
    ("default-emp-07", "Louis Armstrong", Category::Employee),
    ("default-emp-08", "Marie Curie", Category::Employee),
    ("default-emp-09", "Nikola Tesla", Category::Employee),
    ("default-emp-10", "Oscar Wilde", Category::Employee),
    ("default-emp-11", "Pablo Picasso", Category::Employee),
    ("default-emp-12", "Queen Elizabeth", Category::Employee),
    ("default-emp-13", "Rembrandt van Rijn", Category::Employee),
    ("default-emp-14", "Simone de Beauvoir", Category::Employee),
    ("default-emp-15", "Thomas Edison", Category::Employee),
    ("default-emp-16", "Ursula K. Le Guin", Category::Employee),
    ("default-emp-17", "Vincent van Gogh", Category::Employee),
    ("default-emp-18", "Wolfgang Mozart", Category::Employee),
    ("default-emp-19", "Xiaoming Li", Category::Employee),
    ("default-emp-20", "Yoko Ono Zee", Category::Employee),
];

/// Built-in seed roster, sorted by name.
pub fn default_roster() -> Vec<Employee> {
    let mut employees: Vec<Employee> = SEED
        .iter()
        .map(|(id, name, category)| Employee::new(*id, *name, *category))
        .collect();
    sort_by_name(&mut employees);
    employees
}
