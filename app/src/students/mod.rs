use anyhow::Result;
use log::*;

use infra::ids::IdGen;
use infra::persistence::Storage;
use infra::store::Store;

use crate::errors::CanteenError;
use crate::keys::Key;
use crate::services::{Commandable, Queryable, Request};

mod models;

pub use self::models::Student;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListStudents;

/// Adds a student, or replaces the one with the same id. A blank id gets a
/// freshly generated one. The saved student becomes the current student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStudent {
    pub student: Student,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStudent {
    pub student_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentStudent;

#[derive(Debug)]
pub struct Students<S> {
    store: Store<S>,
    idgen: IdGen,
}

impl<S: Storage> Students<S> {
    pub fn new(store: Store<S>, idgen: IdGen) -> Self {
        Students { store, idgen }
    }

    fn load(&self) -> Vec<Student> {
        self.store.read(&Key::Students.name(), Vec::new())
    }

    fn select(&self, student: &Student) {
        self.store.write(&Key::CurrentStudent.name(), student);
    }
}

impl Request for ListStudents {
    type Resp = Vec<Student>;
}

impl<S: Storage> Queryable<ListStudents> for Students<S> {
    fn query(&self, _: ListStudents) -> Result<Vec<Student>> {
        Ok(self.load())
    }
}

impl Request for SaveStudent {
    type Resp = Student;
}

impl<S: Storage> Commandable<SaveStudent> for Students<S> {
    fn execute(&self, req: SaveStudent) -> Result<Student> {
        let mut student = req.student;
        if student.name.trim().is_empty() || student.college.trim().is_empty() {
            return Err(CanteenError::MissingFields.into());
        }
        if student.student_id.trim().is_empty() {
            student.student_id = self.idgen.generate::<Student>().to_string();
        }

        let mut students = self.load();
        match students
            .iter_mut()
            .find(|s| s.student_id == student.student_id)
        {
            Some(existing) => {
                debug!("Updating student {}", student.student_id);
                *existing = student.clone();
            }
            None => {
                debug!("Adding student {}", student.student_id);
                students.push(student.clone());
            }
        }
        self.store.write(&Key::Students.name(), &students);
        self.select(&student);
        Ok(student)
    }
}

impl Request for SelectStudent {
    type Resp = Student;
}

impl<S: Storage> Commandable<SelectStudent> for Students<S> {
    fn execute(&self, req: SelectStudent) -> Result<Student> {
        let student = self
            .load()
            .into_iter()
            .find(|s| s.student_id == req.student_id)
            .ok_or(CanteenError::NoStudentSelected)?;
        self.select(&student);
        info!("Selected student {} ({})", student.student_id, student.name);
        Ok(student)
    }
}

impl Request for CurrentStudent {
    type Resp = Option<Student>;
}

impl<S: Storage> Queryable<CurrentStudent> for Students<S> {
    fn query(&self, _: CurrentStudent) -> Result<Option<Student>> {
        Ok(self.store.read(&Key::CurrentStudent.name(), None))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::junk_drawer::{self, notice};

    #[test]
    fn lists_seeded_student() {
        let canteen = junk_drawer::canteen();

        let students = canteen.students().query(ListStudents).expect("list");

        assert_eq!(students.len(), 1);
        assert_eq!(students[0].student_id, "S2025001");
        assert_eq!(students[0].college, "XYZ College");
    }

    #[test]
    fn new_student_gets_an_id_and_becomes_current() {
        let canteen = junk_drawer::canteen();
        let students = canteen.students();

        let saved = students
            .execute(SaveStudent {
                student: Student::new("Ravi Kumar", "XYZ College"),
            })
            .expect("save");

        assert!(saved.student_id.starts_with("student-"), "{:?}", saved);
        assert_eq!(students.query(ListStudents).expect("list").len(), 2);
        assert_eq!(students.query(CurrentStudent).expect("current"), Some(saved));
    }

    #[test]
    fn given_id_is_kept() {
        let canteen = junk_drawer::canteen();
        let student = Student {
            student_id: "S2025002".to_string(),
            ..Student::new("Meera", "XYZ College")
        };

        let saved = canteen
            .students()
            .execute(SaveStudent {
                student: student.clone(),
            })
            .expect("save");

        assert_eq!(saved, student);
    }

    #[test]
    fn saving_an_existing_id_replaces_it() {
        let canteen = junk_drawer::canteen();
        let students = canteen.students();
        let mut anita = students
            .execute(SelectStudent {
                student_id: "S2025001".to_string(),
            })
            .expect("select");
        anita.year = Some("3rd Year".to_string());

        students
            .execute(SaveStudent {
                student: anita.clone(),
            })
            .expect("save");

        assert_eq!(students.query(ListStudents).expect("list"), vec![anita]);
    }

    #[test]
    fn name_and_college_are_required() {
        let canteen = junk_drawer::canteen();

        let res = canteen.students().execute(SaveStudent {
            student: Student::new("Ravi", " "),
        });

        assert_eq!(notice(res), CanteenError::MissingFields);
        assert_eq!(
            canteen.students().query(ListStudents).expect("list").len(),
            1
        );
    }

    #[test]
    fn selecting_unknown_student_is_refused() {
        let canteen = junk_drawer::canteen();
        let students = canteen.students();

        let res = students.execute(SelectStudent {
            student_id: "S404".to_string(),
        });

        assert_eq!(notice(res), CanteenError::NoStudentSelected);
        assert_eq!(students.query(CurrentStudent).expect("current"), None);
    }
}
