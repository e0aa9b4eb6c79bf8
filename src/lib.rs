/*!
Program structure interface (PSI) over a small Lisp

Source text is parsed into a lossless CST ([`syntax`]), which the [`psi`] layer overlays with
typed elements. Elements are owned by the [`host::PsiManager`] and answer tree navigation, text,
validity, name resolution ([`resolve`]), structural edits and navigation requests.

# Example

```
use psi::{
    host::{PsiManager, Project},
    psi::PsiElement,
};

let manager = PsiManager::new(Project::new("demo", "/tmp/demo"));
let id = manager.add_file("main.sx", "(let x 1) (print x)", true);
let file = manager.file(id).unwrap();

assert!(file.is_valid());
assert_eq!(file.forms().len(), 2);
```
*/

pub mod host;
pub mod psi;
pub mod resolve;
pub mod syntax;
pub mod util;
